//! warp filters for the demo API

use crate::error::{handle_rejection, ApiError};
use crate::handlers;
use framedeck_model::UpdateFrameHtml;
use framedeck_store::SharedStore;
use futures::{Stream, TryStreamExt};
use std::convert::Infallible;
use warp::{Buf, Filter, Rejection, Reply};

/// Largest accepted request body
pub const MAX_BODY_BYTES: u64 = 1024 * 1024;

/// Full API: routes, error recovery, request tracing, CORS
pub fn api(store: SharedStore) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "PUT"])
        .allow_header("content-type");

    list_demos(store.clone())
        .or(update_frame(store))
        .recover(handle_rejection)
        .with(warp::trace::request())
        .with(cors)
}

/// `GET /demos`
pub fn list_demos(
    store: SharedStore,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("demos")
        .and(warp::get())
        .and(with_store(store))
        .and_then(handlers::list_demos)
}

/// `PUT /frames/{id}` with `{ "html": string }`
pub fn update_frame(
    store: SharedStore,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("frames" / String)
        .and(warp::put())
        .and(json_body())
        .and(with_store(store))
        .and_then(handlers::update_frame)
}

fn with_store(store: SharedStore) -> impl Filter<Extract = (SharedStore,), Error = Infallible> + Clone {
    warp::any().map(move || store.clone())
}

/// JSON body capped at [`MAX_BODY_BYTES`], with or without `Content-Length`
fn json_body() -> impl Filter<Extract = (UpdateFrameHtml,), Error = Rejection> + Clone {
    warp::header::optional::<u64>("content-length")
        .and(warp::body::stream())
        .and_then(read_json)
}

async fn read_json<S, B>(declared: Option<u64>, body: S) -> Result<UpdateFrameHtml, Rejection>
where
    S: Stream<Item = Result<B, warp::Error>> + Send,
    B: Buf,
{
    if declared.is_some_and(|len| len > MAX_BODY_BYTES) {
        return Err(warp::reject::custom(ApiError::PayloadTooLarge));
    }

    let limit = usize::try_from(MAX_BODY_BYTES).unwrap_or(usize::MAX);
    let mut bytes = Vec::new();
    futures::pin_mut!(body);
    while let Some(mut chunk) = body
        .try_next()
        .await
        .map_err(|e| warp::reject::custom(ApiError::BadRequest(format!("unreadable body: {e}"))))?
    {
        if bytes.len() + chunk.remaining() > limit {
            return Err(warp::reject::custom(ApiError::PayloadTooLarge));
        }
        while chunk.has_remaining() {
            let part = chunk.chunk();
            let len = part.len();
            bytes.extend_from_slice(part);
            chunk.advance(len);
        }
    }

    serde_json::from_slice(&bytes).map_err(|e| {
        warp::reject::custom(ApiError::BadRequest(format!("invalid request body: {e}")))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use warp::hyper::body::Bytes;

    fn chunks(parts: Vec<Vec<u8>>) -> impl Stream<Item = Result<Bytes, warp::Error>> + Send {
        futures::stream::iter(parts.into_iter().map(|part| Ok(Bytes::from(part))))
    }

    fn limit() -> usize {
        usize::try_from(MAX_BODY_BYTES).unwrap()
    }

    #[tokio::test]
    async fn reads_body_split_across_chunks() {
        let body = chunks(vec![br#"{"html":"#.to_vec(), br#""<p>hi</p>"}"#.to_vec()]);
        let update = read_json(None, body).await.unwrap();
        assert_eq!(update.html, "<p>hi</p>");
    }

    #[tokio::test]
    async fn undeclared_oversized_body_is_too_large() {
        let body = chunks(vec![vec![b' '; limit()], vec![b' '; 1]]);
        let err = read_json(None, body).await.unwrap_err();
        assert_eq!(err.find::<ApiError>(), Some(&ApiError::PayloadTooLarge));
    }

    #[tokio::test]
    async fn declared_oversized_body_is_refused_before_reading() {
        let err = read_json(Some(MAX_BODY_BYTES + 1), chunks(Vec::new()))
            .await
            .unwrap_err();
        assert_eq!(err.find::<ApiError>(), Some(&ApiError::PayloadTooLarge));
    }

    #[tokio::test]
    async fn body_at_limit_is_read() {
        let prefix = br#"{"html":""#;
        let suffix = br#""}"#;
        let filler = vec![b'x'; limit() - prefix.len() - suffix.len()];
        let body = chunks(vec![prefix.to_vec(), filler, suffix.to_vec()]);

        let update = read_json(None, body).await.unwrap();
        assert_eq!(update.html.len(), limit() - prefix.len() - suffix.len());
    }
}
