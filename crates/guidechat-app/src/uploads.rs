//! Reading report files from disk.

use std::path::Path;

use guidechat_ai::{ReportRequest, Upload};
use guidechat_common::GuidechatError;

use crate::cli::ReportArgs;

/// Read one local file into an upload named after the file.
pub async fn read_upload(path: &Path) -> Result<Upload, GuidechatError> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| GuidechatError::InvalidInput(format!("bad file name: {}", path.display())))?;
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        GuidechatError::InvalidInput(format!("cannot read {}: {e}", path.display()))
    })?;
    tracing::debug!(filename, size = bytes.len(), "read upload");
    Ok(Upload::new(filename, bytes))
}

pub async fn build_request(args: &ReportArgs) -> Result<ReportRequest, GuidechatError> {
    let site = match args.site {
        Some(ref path) => Some(read_upload(path).await?),
        None => None,
    };
    let mut competitors = Vec::with_capacity(args.competitors.len());
    for path in &args.competitors {
        competitors.push(read_upload(path).await?);
    }
    Ok(ReportRequest {
        site,
        competitors,
        keyword: args.keyword.clone(),
    })
}
