use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildRequest {
    pub first_name: String,
    pub last_name: String,
    pub school_level: String,
}
