use std::io;
use std::path::Path;

/// Marker prepended to every normalized export.
pub const NORMALIZED_FILE_PREFIX: &str = "FOCUS_1.3_Normalized_";

/// A billing export picked by the user. Its format is not checked locally;
/// the conversion service decides what it accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingFile {
    pub name: String,
    pub contents: Vec<u8>,
}

impl BillingFile {
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    pub async fn read(path: &Path) -> io::Result<Self> {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("not a file path: {}", path.display()),
                )
            })?
            .to_string();
        let contents = tokio::fs::read(path).await?;
        Ok(Self::new(name, contents))
    }

    pub fn normalized_name(&self) -> String {
        normalized_filename(&self.name)
    }
}

pub fn normalized_filename(original: &str) -> String {
    format!("{NORMALIZED_FILE_PREFIX}{original}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn normalized_filename_prefixes_original_name() {
        assert_eq!(
            normalized_filename("aws_cur.csv"),
            "FOCUS_1.3_Normalized_aws_cur.csv"
        );
        assert_eq!(
            BillingFile::new("azure usage.CSV", Vec::new()).normalized_name(),
            "FOCUS_1.3_Normalized_azure usage.CSV"
        );
    }

    #[tokio::test]
    async fn read_keeps_file_name_and_bytes() {
        let file = assert_fs::NamedTempFile::new("aws_cur.csv").unwrap();
        file.write_str("lineItem/UsageAmount\n1.5\n").unwrap();

        let billing = BillingFile::read(file.path()).await.unwrap();

        assert_eq!(billing.name, "aws_cur.csv");
        assert_eq!(billing.contents, b"lineItem/UsageAmount\n1.5\n");
    }
}
