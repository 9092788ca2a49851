//! Pretty-print helpers for CLI output

use crate::error::PdakitResult;
use crate::idl::{IdlInstruction, IdlSeed};
use crate::pda::{DeriveAllReport, DerivedAddress, Readiness};
use crate::schema::display_name;
use crate::value::WireValue;
use colored::Colorize;

/// Print a main header (command title)
pub fn print_header(title: &str) {
    println!();
    println!("{}", title.bold().cyan());
    println!("{}", "─".repeat(50).dimmed());
}

/// Print a sub-header (section within output)
pub fn print_subheader(title: &str) {
    println!();
    println!("{}", title.bold().white());
}

/// Print a key-value pair
pub fn print_field(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Display converted arguments, one per line, then the whole object as JSON
pub fn display_wire_args(
    instruction: &IdlInstruction,
    values: &[(String, WireValue)],
) -> PdakitResult<()> {
    print_header(&format!("Arguments for {}", instruction.name.green()));

    if values.is_empty() {
        println!("  {}", "(none)".dimmed());
    }

    for (name, value) in values {
        let ty = instruction
            .arg(name)
            .map(|arg| display_name(&arg.ty))
            .unwrap_or_default();
        println!(
            "  {} : {} = {}",
            name.yellow(),
            ty.blue(),
            value.to_json()?
        );
    }

    let object = WireValue::Struct(values.to_vec()).to_json()?;
    print_subheader("JSON");
    println!("{}", serde_json::to_string_pretty(&object)?);
    println!();
    Ok(())
}

/// Display one derived address with its seed buffers
pub fn display_derived(account: &str, derived: &DerivedAddress) {
    print_header(&format!("PDA: {}", account.yellow()));
    print_field("Address", &derived.address.to_string().green().to_string());
    print_field("Bump", &derived.bump.to_string());
    print_field("Program", &derived.program_id.to_string());

    print_subheader(&format!("Seeds ({})", derived.seeds.len()));
    for (i, seed) in derived.seeds.iter().enumerate() {
        println!(
            "  {}. {}",
            format!("{:>2}", i + 1).dimmed(),
            format_seed_bytes(seed)
        );
    }
    println!();
}

/// Display the outcome of deriving every PDA of an instruction
pub fn display_derive_report(report: &DeriveAllReport) {
    for (account, derived) in &report.derived {
        display_derived(account, derived);
    }

    if !report.pending.is_empty() {
        print_subheader("Pending");
        for (account, readiness) in &report.pending {
            println!("  {} {}", account.yellow(), readiness.status_text().dimmed());
        }
        println!();
    }
}

/// Display readiness of one PDA account
pub fn display_readiness(account: &str, readiness: &Readiness) {
    let status = if readiness.is_ready() {
        readiness.status_text().green()
    } else {
        readiness.status_text().red()
    };
    println!("  {}: {}", account.yellow(), status);
}

/// Display the seed recipe of every PDA account in an instruction
pub fn display_seed_recipes(instruction: &IdlInstruction) {
    print_header(&format!("Seeds for {}", instruction.name.green()));

    let pdas: Vec<_> = instruction
        .flat_accounts()
        .into_iter()
        .filter(|account| account.pda.is_some())
        .collect();

    if pdas.is_empty() {
        println!("  {}", "(no PDA accounts)".dimmed());
    }

    for account in pdas {
        let Some(pda) = &account.pda else { continue };
        print_subheader(&account.name);
        for (i, seed) in pda.seeds.iter().enumerate() {
            println!(
                "  {}. {}",
                format!("{:>2}", i + 1).dimmed(),
                format_seed(seed)
            );
        }
        if let Some(program) = &pda.program {
            println!("  {} {}", "program:".dimmed(), format_seed(program));
        }
    }
    println!();
}

/// Format a seed recipe entry like `arg amount` or `const "vault"`
pub fn format_seed(seed: &IdlSeed) -> String {
    match seed {
        IdlSeed::Const { value } => format!("{} {}", "const".magenta(), format_seed_bytes(value)),
        IdlSeed::Arg { path } => format!("{} {}", "arg".blue(), path),
        IdlSeed::Account { path, account } => match account {
            Some(owner) => format!("{} {} ({})", "account".green(), path, owner),
            None => format!("{} {}", "account".green(), path),
        },
    }
}

/// Printable UTF-8 shows as a quoted string, anything else as hex
pub fn format_seed_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) if !text.is_empty() && text.chars().all(|c| c.is_ascii_graphic() || c == ' ') => {
            format!("\"{}\"", text)
        }
        _ => format_hex(bytes),
    }
}

/// Format bytes as hex
pub fn format_hex(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        "(empty)".to_string()
    } else {
        let hex: Vec<String> = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        format!("[{}]", hex.join(" "))
    }
}

/// Display an error message
pub fn display_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}

/// Display name-not-found error with suggestions
pub fn display_not_found(kind: &str, name: &str, available: &[&str]) {
    display_error(&format!("{} '{}' not found", kind, name));

    if !available.is_empty() {
        eprintln!();
        eprintln!("{}", format!("Available {}s:", kind.to_lowercase()).dimmed());
        for item in available.iter().take(10) {
            eprintln!("  - {}", item.green());
        }
        if available.len() > 10 {
            eprintln!("  {} more...", format!("(+{})", available.len() - 10).dimmed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_seed_bytes() {
        assert_eq!(format_seed_bytes(b"vault"), "\"vault\"");
        assert_eq!(format_seed_bytes(&[232, 3, 0, 0]), "[e8 03 00 00]");
        assert_eq!(format_seed_bytes(&[]), "(empty)");
    }
}
