use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::error::{EconomyError, EconomyResult};

use super::SaveData;

pub fn save_to_json_string(save_data: &SaveData) -> EconomyResult<String> {
    Ok(serde_json::to_string(save_data)?)
}

pub fn load_from_json_string(json: &str) -> EconomyResult<SaveData> {
    serde_json::from_str(json).map_err(|err| malformed(format!("invalid save JSON: {err}")))
}

pub fn export_to_base64(save_data: &SaveData) -> EconomyResult<String> {
    let json = save_to_json_string(save_data)?;
    Ok(STANDARD.encode(json.as_bytes()))
}

pub fn import_from_base64(encoded: &str) -> EconomyResult<SaveData> {
    let raw = STANDARD
        .decode(encoded.trim())
        .map_err(|err| malformed(format!("invalid base64 save payload: {err}")))?;
    let json = String::from_utf8(raw)
        .map_err(|err| malformed(format!("decoded save payload is not UTF-8: {err}")))?;
    load_from_json_string(&json)
}

/// Accepts either a raw JSON record or its base64 export.
pub fn import_save_text(text: &str) -> EconomyResult<SaveData> {
    if text.trim_start().starts_with('{') {
        load_from_json_string(text)
    } else {
        import_from_base64(text)
    }
}

fn malformed(reason: String) -> EconomyError {
    EconomyError::MalformedSave { reason }
}
