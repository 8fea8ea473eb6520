//! Status command handler

use anyhow::Result;

use wordlink_core::{Config, OwnerId};

use super::Service;
use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(service: &Service, config: &Config, owner: OwnerId, output: &Output) -> Result<()> {
    let db_path = config.sqlite_path();
    let db_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);
    let words = service.count_words(owner)?;
    let sentences = service.count_sentences(owner)?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "owner_id": owner,
                    "render_mode": config.render_mode,
                    "storage": {
                        "data_dir": config.data_dir,
                        "database": db_path,
                        "database_size": db_size
                    },
                    "counts": {
                        "words": words,
                        "sentences": sentences
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{} {}", words, sentences);
        }
        OutputFormat::Human => {
            println!("Wordlink Status");
            println!("===============");
            println!();
            println!("Owner:       {}", owner);
            println!("Render mode: {}", config.render_mode);
            println!();
            println!("Storage:");
            println!("  Location: {}", db_path.display());
            println!("  Size:     {}", format_size(db_size));
            println!();
            println!("Contents:");
            println!("  Words:     {}", words);
            println!("  Sentences: {}", sentences);
        }
    }

    Ok(())
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
