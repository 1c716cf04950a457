//! Chunked upload body that reports bytes handed to the transport.

use futures_util::Stream;

/// Bytes per body chunk.
pub const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Whole-number percentage of `sent` over `total`, clamped to 100.
///
/// An empty body counts as fully sent.
pub fn percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    (sent.min(total).saturating_mul(100) / total) as u8
}

/// Split `bytes` into a body stream, calling `on_progress(sent, total)`
/// once up front with `sent = 0` and again as each chunk is handed out.
///
/// `sent` never decreases and the last call always has `sent == total`.
pub fn progress_chunks<F>(
    bytes: Vec<u8>,
    chunk_size: usize,
    on_progress: F,
) -> impl Stream<Item = Result<Vec<u8>, std::io::Error>> + Send + 'static
where
    F: Fn(u64, u64) + Send + Sync + 'static,
{
    let chunk_size = chunk_size.max(1);
    async_stream::stream! {
        let total = bytes.len() as u64;
        on_progress(0, total);
        let mut sent = 0u64;
        for chunk in bytes.chunks(chunk_size) {
            sent += chunk.len() as u64;
            on_progress(sent, total);
            yield Ok(chunk.to_vec());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_percent() {
        assert_eq!(percent(0, 200), 0);
        assert_eq!(percent(50, 200), 25);
        assert_eq!(percent(199, 200), 99);
        assert_eq!(percent(200, 200), 100);
        assert_eq!(percent(300, 200), 100);
        assert_eq!(percent(0, 0), 100);
    }

    #[tokio::test]
    async fn test_chunks_reassemble_and_report() {
        let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();

        let chunks: Vec<Vec<u8>> = progress_chunks(data.clone(), 300, move |sent, total| {
            sink.lock().unwrap().push((sent, total));
        })
        .map(|c| c.unwrap())
        .collect()
        .await;

        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks.concat(), data);
        assert_eq!(
            *calls.lock().unwrap(),
            vec![(0, 1000), (300, 1000), (600, 1000), (900, 1000), (1000, 1000)]
        );
    }

    #[tokio::test]
    async fn test_empty_body_reports_once() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        let chunks: Vec<_> = progress_chunks(Vec::new(), 16, move |sent, total| {
            sink.lock().unwrap().push((sent, total));
        })
        .collect()
        .await;
        assert!(chunks.is_empty());
        assert_eq!(*calls.lock().unwrap(), vec![(0, 0)]);
    }
}
