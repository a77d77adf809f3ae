//! Upload sink: the seam between the export pipeline and storage transport.

use crate::error::UploadError;
use crate::pipeline::SideExport;
use pod_core::Side;

/// A stored raster, addressable by URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    pub url: String,
}

/// Receives encoded PNG bytes. HTTP (or any transport) lives behind this.
#[allow(async_fn_in_trait)]
pub trait UploadSink {
    async fn upload_raster(&self, bytes: Vec<u8>, filename: &str)
    -> Result<UploadedAsset, UploadError>;
}

/// The pair of stored artifacts for one exported side; the caller associates
/// these (plus the document snapshot) with its cart/order line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideUploads {
    pub side: Side,
    pub preview_url: String,
    pub print_url: String,
}

/// Hand one side's artifacts to the sink under conventional filenames.
pub async fn upload_export<U: UploadSink>(
    sink: &U,
    export: &SideExport,
) -> Result<SideUploads, UploadError> {
    let preview = sink
        .upload_raster(
            export.preview_png.clone(),
            &format!("{}-preview.png", export.side),
        )
        .await?;
    let print = sink
        .upload_raster(
            export.print_png.clone(),
            &format!("{}-print.png", export.side),
        )
        .await?;
    Ok(SideUploads {
        side: export.side,
        preview_url: preview.url,
        print_url: print.url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_core::Snapshot;
    use std::sync::Mutex;

    struct RecordingSink {
        seen: Mutex<Vec<String>>,
    }

    impl UploadSink for RecordingSink {
        async fn upload_raster(
            &self,
            _bytes: Vec<u8>,
            filename: &str,
        ) -> Result<UploadedAsset, UploadError> {
            self.seen.lock().unwrap().push(filename.to_string());
            Ok(UploadedAsset {
                url: format!("https://cdn.example/{filename}"),
            })
        }
    }

    #[tokio::test]
    async fn uploads_both_artifacts_under_side_names() {
        let sink = RecordingSink {
            seen: Mutex::new(Vec::new()),
        };
        let export = SideExport {
            side: Side::Back,
            snapshot: Snapshot::default(),
            preview_png: vec![1, 2, 3],
            print_png: vec![4, 5, 6],
            preview_size: (500, 620),
            print_size: (750, 1000),
        };

        let uploads = upload_export(&sink, &export).await.unwrap();
        assert_eq!(uploads.preview_url, "https://cdn.example/back-preview.png");
        assert_eq!(uploads.print_url, "https://cdn.example/back-print.png");
        assert_eq!(
            *sink.seen.lock().unwrap(),
            vec!["back-preview.png".to_string(), "back-print.png".to_string()]
        );
    }
}
