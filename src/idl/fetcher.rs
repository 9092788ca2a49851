//! IDL loading from multiple sources: on-chain, file, or URL

use crate::error::{PdakitError, PdakitResult};
use crate::idl::legacy::LegacyIdl;
use crate::idl::Idl;
use flate2::read::{DeflateDecoder, ZlibDecoder};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::pubkey::Pubkey;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub const IDL_SEED: &str = "anchor:idl";

const HTTP_TIMEOUT_SECS: u64 = 30;
const DISCRIMINATOR_SIZE: usize = 8;
const AUTHORITY_SIZE: usize = 32;
const DATA_LEN_SIZE: usize = 4;
const DATA_LEN_OFFSET: usize = DISCRIMINATOR_SIZE + AUTHORITY_SIZE;
const HEADER_SIZE: usize = DATA_LEN_OFFSET + DATA_LEN_SIZE;

/// Where to read an IDL from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdlSource {
    /// The program's Anchor IDL account
    OnChain(Pubkey),
    /// Local JSON file
    File(String),
    /// Remote JSON file
    Url(String),
}

impl IdlSource {
    /// Classify a `--idl` argument: http(s) URLs are remote, anything else is a path.
    pub fn from_location(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            IdlSource::Url(location.to_string())
        } else {
            IdlSource::File(location.to_string())
        }
    }
}

/// Load IDL from the specified source.
pub async fn load_idl(source: &IdlSource, rpc_url: &str) -> PdakitResult<Idl> {
    debug!(?source, "loading IDL");
    match source {
        IdlSource::OnChain(program_id) => fetch_idl_from_chain(program_id, rpc_url).await,
        IdlSource::File(path) => load_idl_from_file(path),
        IdlSource::Url(url) => fetch_idl_from_url(url).await,
    }
}

/// Fetch IDL from on-chain IDL account.
pub async fn fetch_idl_from_chain(program_id: &Pubkey, rpc_url: &str) -> PdakitResult<Idl> {
    let client = RpcClient::new(rpc_url.to_string());
    fetch_idl_with_client(&client, program_id).await
}

/// Fetch IDL using an existing RPC client.
pub async fn fetch_idl_with_client(client: &RpcClient, program_id: &Pubkey) -> PdakitResult<Idl> {
    let idl_address = get_idl_address(program_id)?;

    let response = client
        .get_account_with_commitment(&idl_address, client.commitment())
        .await?;

    let account = response
        .value
        .ok_or_else(|| PdakitError::IdlNotFound(program_id.to_string()))?;

    debug!(%idl_address, len = account.data.len(), "fetched IDL account");
    decode_idl_account(&account.data)
}

/// Decode the raw data of an Anchor IDL account:
/// discriminator, authority, length prefix, then compressed JSON.
pub fn decode_idl_account(data: &[u8]) -> PdakitResult<Idl> {
    if data.len() < HEADER_SIZE {
        return Err(PdakitError::DecompressionError(
            "Account data too small for IDL header".to_string(),
        ));
    }

    let data_len_bytes: [u8; 4] = data[DATA_LEN_OFFSET..DATA_LEN_OFFSET + DATA_LEN_SIZE]
        .try_into()
        .map_err(|_| PdakitError::DecompressionError("Failed to read data_len".to_string()))?;
    let data_len = u32::from_le_bytes(data_len_bytes) as usize;

    if data_len == 0 {
        return Err(PdakitError::DecompressionError(
            "IDL compressed data is empty".to_string(),
        ));
    }

    if data.len() < HEADER_SIZE + data_len {
        return Err(PdakitError::DecompressionError(format!(
            "Compressed data truncated: expected {} bytes, got {}",
            data_len,
            data.len() - HEADER_SIZE
        )));
    }

    let compressed = &data[HEADER_SIZE..HEADER_SIZE + data_len];
    let json_bytes = decompress_idl_data(compressed)?;

    let json_str = std::str::from_utf8(&json_bytes)
        .map_err(|_| PdakitError::DecompressionError("Invalid UTF-8".to_string()))?;

    parse_idl_json(json_str)
}

/// Load IDL from a local JSON file.
pub fn load_idl_from_file(path: &str) -> PdakitResult<Idl> {
    let path = Path::new(path);

    if !path.exists() {
        return Err(PdakitError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File not found: {}", path.display()),
        )));
    }

    let contents = std::fs::read_to_string(path)?;
    parse_idl_json(&contents)
}

/// Fetch IDL from a remote URL.
pub async fn fetch_idl_from_url(url: &str) -> PdakitResult<Idl> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .map_err(|e| PdakitError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| PdakitError::NetworkError(format!("HTTP request failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(PdakitError::HttpError {
            status: response.status().as_u16(),
            url: url.to_string(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| PdakitError::NetworkError(format!("Failed to read response body: {}", e)))?;

    parse_idl_json(&body)
}

/// Parse IDL JSON, auto-detecting format (0.1.0 spec vs legacy).
pub fn parse_idl_json(json_str: &str) -> PdakitResult<Idl> {
    let value: serde_json::Value = serde_json::from_str(json_str)?;

    let is_new_format = value.get("address").map(|v| v.is_string()).unwrap_or(false);
    if is_new_format {
        return Ok(serde_json::from_value(value)?);
    }

    if value.get("name").is_some() {
        debug!("IDL has no root address, reading as legacy");
        let legacy: LegacyIdl = serde_json::from_value(value)?;
        return Idl::try_from(legacy);
    }

    Ok(serde_json::from_value(value)?)
}

/// Derive the IDL account address for a program.
pub fn get_idl_address(program_id: &Pubkey) -> PdakitResult<Pubkey> {
    let (program_signer, _bump) = Pubkey::find_program_address(&[], program_id);

    let idl_address = Pubkey::create_with_seed(&program_signer, IDL_SEED, program_id)
        .map_err(|e| PdakitError::InvalidProgramId(e.to_string()))?;

    Ok(idl_address)
}

fn decompress_idl_data(compressed: &[u8]) -> PdakitResult<Vec<u8>> {
    if let Ok(bytes) = decompress_zlib(compressed) {
        return Ok(bytes);
    }

    if let Ok(bytes) = decompress_deflate(compressed) {
        return Ok(bytes);
    }

    Err(PdakitError::DecompressionError(
        "Failed to decompress IDL data".to_string(),
    ))
}

fn decompress_zlib(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut bytes = Vec::new();
    decoder.read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn decompress_deflate(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = DeflateDecoder::new(data);
    let mut bytes = Vec::new();
    decoder.read_to_end(&mut bytes)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    const IDL_JSON: &str = r#"{
        "address": "Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS",
        "metadata": { "name": "demo", "version": "0.1.0", "spec": "0.1.0" },
        "instructions": [{ "name": "init", "accounts": [], "args": [] }]
    }"#;

    fn idl_account(json: &str) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(json.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        let mut data = vec![0u8; DATA_LEN_OFFSET];
        data.extend_from_slice(&(compressed.len() as u32).to_le_bytes());
        data.extend_from_slice(&compressed);
        data
    }

    #[test]
    fn test_get_idl_address_deterministic() {
        let program_id: Pubkey = "JUP6LkbZbjS1jKKwapdHNy74zcZ3tLUZoi5QNyVTaV4"
            .parse()
            .unwrap();

        let addr1 = get_idl_address(&program_id).unwrap();
        let addr2 = get_idl_address(&program_id).unwrap();

        assert_ne!(addr1, program_id);
        assert_eq!(addr1, addr2);
    }

    #[test]
    fn test_header_constants() {
        assert_eq!(DATA_LEN_OFFSET, 40);
        assert_eq!(HEADER_SIZE, 44);
    }

    #[test]
    fn test_decode_idl_account() {
        let idl = decode_idl_account(&idl_account(IDL_JSON)).unwrap();
        assert_eq!(idl.metadata.name, "demo");
        assert_eq!(idl.instructions.len(), 1);
    }

    #[test]
    fn test_decode_truncated_account() {
        let mut data = idl_account(IDL_JSON);
        data.truncate(HEADER_SIZE + 2);
        let err = decode_idl_account(&data).unwrap_err();
        assert!(err.to_string().contains("truncated"), "{}", err);

        let err = decode_idl_account(&[0u8; 10]).unwrap_err();
        assert!(matches!(err, PdakitError::DecompressionError(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idl.json");
        std::fs::write(&path, IDL_JSON).unwrap();

        let idl = load_idl_from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(idl.address, "Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            load_idl_from_file(missing.to_str().unwrap()),
            Err(PdakitError::IoError(_))
        ));
    }

    #[test]
    fn test_parse_legacy_json() {
        let idl = parse_idl_json(
            r#"{ "version": "0.1.0", "name": "old", "instructions": [], "accounts": [] }"#,
        )
        .unwrap();
        assert_eq!(idl.metadata.name, "old");
        assert_eq!(idl.metadata.spec, "legacy");
    }

    #[test]
    fn test_source_from_location() {
        assert_eq!(
            IdlSource::from_location("https://example.com/idl.json"),
            IdlSource::Url("https://example.com/idl.json".into())
        );
        assert_eq!(
            IdlSource::from_location("./target/idl/demo.json"),
            IdlSource::File("./target/idl/demo.json".into())
        );
    }
}
