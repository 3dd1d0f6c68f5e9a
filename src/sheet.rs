use serde::Serialize;

use crate::models::Record;

/// Posts newly saved records to a user-configured spreadsheet webhook.
#[derive(Clone)]
pub struct SheetExporter {
    client: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct SheetRow<'a> {
    kind: &'static str,
    text: &'a str,
    summary: &'a str,
    saved_at: String,
    record: &'a Record,
}

impl SheetExporter {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Exporter for the configured URL, if one is set.
    pub fn from_setting(url: Option<&str>) -> Option<Self> {
        url.map(str::trim).filter(|u| !u.is_empty()).map(Self::new)
    }

    pub async fn export(&self, record: &Record) -> Result<(), reqwest::Error> {
        let row = SheetRow {
            kind: record.kind().as_str(),
            text: record.text(),
            summary: record.summary(),
            saved_at: chrono::Utc::now().to_rfc3339(),
            record,
        };

        self.client
            .post(&self.url)
            .json(&row)
            .send()
            .await?
            .error_for_status()?;

        tracing::info!(kind = row.kind, "exported record to sheet");
        Ok(())
    }

    /// Export whose failure is only logged.
    pub async fn export_quietly(&self, record: &Record) {
        if let Err(e) = self.export(record).await {
            tracing::warn!("sheet export failed: {e}");
        }
    }
}
