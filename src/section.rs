use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Section {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// `text` is `None` when the key is absent and `Some(None)` when it is null.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct LemmaText {
    #[serde(default, deserialize_with = "present")]
    pub text: Option<Option<String>>,
}

impl LemmaText {
    /// Only a missing key or an empty string counts as empty; a null text
    /// still qualifies the section.
    pub fn is_empty(&self) -> bool {
        match &self.text {
            None => true,
            Some(Some(text)) => text.is_empty(),
            Some(None) => false,
        }
    }
}

/// Section ids come back as strings from some repositories and as bare
/// numbers from others.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Uint(n) => n.to_string(),
    })
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
