//! Stored settings formatter

use super::utils::export_json;
use super::OutputFormat;
use crate::errors::AppResult;
use crate::types::StorageSettings;

pub fn format_settings(
    settings: Option<&StorageSettings>,
    format: &OutputFormat,
) -> AppResult<String> {
    match format {
        OutputFormat::Json => export_json(&settings),
        OutputFormat::Console => {
            let settings = match settings {
                Some(settings) => settings,
                None => return Ok("No storage settings saved yet\n".to_string()),
            };

            let mut output = String::new();
            output.push_str("\n⚙️  STORAGE SETTINGS\n");
            output.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
            output.push_str(&format!("Provider:         {}\n", settings.provider));
            output.push_str(&format!("Bucket:           {}\n", settings.bucket_name));
            output.push_str(&format!("Region:           {}\n", settings.region));
            output.push_str(&format!(
                "Endpoint host:    {}\n",
                settings.endpoint_host.as_deref().unwrap_or("(from region)")
            ));
            output.push_str(&format!(
                "Public base URL:  {}\n",
                settings.public_base_url.as_deref().unwrap_or("-")
            ));
            output.push_str(&format!("Max upload:       {} MB\n", settings.max_upload_mb));
            output.push_str(&format!(
                "Updated:          {}\n",
                settings
                    .updated_at
                    .map(|ts| ts.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                    .unwrap_or_else(|| "never".to_string())
            ));
            Ok(output)
        }
    }
}
