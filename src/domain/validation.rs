use serde::Deserialize;

/// One step of a field path reported by the service (`["body", "unitCost"]`).
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum LocSegment {
    Name(String),
    Index(i64),
}

impl std::fmt::Display for LocSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocSegment::Name(name) => f.write_str(name),
            LocSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ValidationErrorDetail {
    pub loc: Vec<LocSegment>,
    pub msg: String,
}

impl ValidationErrorDetail {
    /// The offending field. The first segment names where in the request the
    /// field lives (body, query, ...), so it is dropped when more follow.
    pub fn field(&self) -> String {
        let path = if self.loc.len() > 1 {
            &self.loc[1..]
        } else {
            &self.loc[..]
        };
        if path.is_empty() {
            return "request".to_string();
        }
        path.iter()
            .map(|segment| segment.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn message(&self) -> String {
        format!("{}: {}", self.field(), self.msg)
    }
}
