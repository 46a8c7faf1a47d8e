//! Saving a strip out of the booth, routed around hosts that block downloads.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    foundation::error::BoothResult,
    storage::strips::PhotoStrip,
    strip::{
        compose::{StripOptions, compose_strip},
        data_url::decode_data_url,
    },
};

/// Shown when the host cannot save files at all.
pub const OPEN_ELSEWHERE_INSTRUCTIONS: &str = "This browser doesn't support downloads. \
Please open this page in Safari or Chrome to download your photos. Your photos are saved in the gallery!";

/// How a strip can leave the booth on the current host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportRoute {
    /// Write the image file directly.
    Direct,
    /// Save is blocked but a separate page works: write a page holding the image and a
    /// long-press hint.
    NewContext,
    /// Neither works (in-app browsers); the user must reopen the booth elsewhere.
    OpenElsewhere,
}

impl ExportRoute {
    /// Pick the route for a host identified by its user agent and whether it is Brave.
    pub fn detect(user_agent: &str, brave: bool) -> Self {
        if user_agent.contains("Instagram") {
            Self::OpenElsewhere
        } else if brave {
            Self::NewContext
        } else {
            Self::Direct
        }
    }
}

/// What an export produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Exported {
    /// A file was written.
    Saved(PathBuf),
    /// Nothing was attempted; show these instructions instead.
    OpenElsewhere(&'static str),
}

/// Compose `strip` and save it under `dir` along `route`.
#[tracing::instrument(skip(strip), fields(id = strip.id))]
pub async fn export_strip(strip: &PhotoStrip, route: ExportRoute, dir: &Path) -> BoothResult<Exported> {
    if route == ExportRoute::OpenElsewhere {
        return Ok(Exported::OpenElsewhere(OPEN_ELSEWHERE_INSTRUCTIONS));
    }

    let opts = StripOptions::styled(strip.style, Some(strip.date.clone()));
    let url = compose_strip(&strip.photos, &opts).await?;
    let file_name = strip.file_name();

    let (path, bytes) = match route {
        ExportRoute::Direct => (dir.join(&file_name), decode_data_url(&url)?),
        _ => {
            let page = save_page(&file_name, &url);
            (dir.join(format!("photo-strip-{}.html", strip.id)), page.into_bytes())
        }
    };
    tokio::fs::write(&path, bytes)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), ?route, "strip exported");
    Ok(Exported::Saved(path))
}

fn save_page(file_name: &str, data_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{file_name}</title>
    <style>
      body {{ margin: 0; padding: 20px; font-family: system-ui, sans-serif; background: #000; color: #fff; text-align: center; }}
      img {{ max-width: 100%; height: auto; margin: 20px auto; display: block; }}
    </style>
  </head>
  <body>
    <h1>Your Photo Strip</h1>
    <img src="{data_url}" alt="{file_name}" />
    <p><strong>To save your photo:</strong></p>
    <p>Long press the image above and select "Save Image" or "Download Image"</p>
    <a href="{data_url}" download="{file_name}">Or Click Here to Download</a>
  </body>
</html>
"#
    )
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
