//! Request body encoders.
//!
//! Two encoders cover every mutating operation: a flat
//! `application/x-www-form-urlencoded` encoder for plain parameter sets and
//! a hand-built `multipart/form-data` encoder for operations that carry
//! photo attachments.
//!
//! Neither keys nor values are percent-encoded in the flat encoding. The
//! server parses bodies as-is, so applying encoding here would change the
//! server-observed request shape. This is a wire contract, not an oversight.

use bytes::{BufMut, Bytes, BytesMut};

use crate::forms::MediaFile;

/// The fixed multipart boundary token shared by every upload request.
///
/// The server pins this value; it is deliberately not randomized
/// per-request.
pub const MULTIPART_BOUNDARY: &str = "FFF";

/// An ordered set of form parameters, encoded in insertion order.
pub type Params = Vec<(String, String)>;

/// Encodes parameters as `key1=value1&key2=value2…` UTF-8 bytes.
///
/// Values pass through verbatim, with no percent-encoding (see the module
/// docs).
#[must_use]
pub fn url_encode(params: &[(String, String)]) -> Bytes {
    let mut body = String::new();
    for (key, value) in params {
        if !body.is_empty() {
            body.push('&');
        }
        body.push_str(key);
        body.push('=');
        body.push_str(value);
    }
    Bytes::from(body)
}

/// Builds a `multipart/form-data` body with the fixed [`MULTIPART_BOUNDARY`].
///
/// Layout: one `Content-Disposition: form-data` part per parameter, then one
/// part per media file (with filename and Content-Type), then the closing
/// boundary marker. Parameters always precede files; within each group the
/// caller's insertion order is preserved.
#[must_use]
pub fn multipart(params: &[(String, String)], files: &[MediaFile]) -> Bytes {
    let mut body = BytesMut::new();

    for (key, value) in params {
        body.put_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        body.put_slice(format!("Content-Disposition: form-data; name=\"{key}\"\r\n\r\n").as_bytes());
        body.put_slice(value.as_bytes());
        body.put_slice(b"\r\n");
    }

    for file in files {
        body.put_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        body.put_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                file.field, file.filename
            )
            .as_bytes(),
        );
        body.put_slice(format!("Content-Type: {}\r\n\r\n", file.mime).as_bytes());
        body.put_slice(&file.data);
        body.put_slice(b"\r\n");
    }

    body.put_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body.freeze()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn url_encode_joins_pairs_in_order() {
        let body = url_encode(&params(&[("name", "Push-up Park"), ("city", "Riga")]));
        assert_eq!(&body[..], b"name=Push-up Park&city=Riga");
    }

    #[test]
    fn url_encode_round_trips_through_a_form_parser() {
        let pairs = params(&[("title", "Morning session"), ("ground", "12")]);
        let body = url_encode(&pairs);

        let parsed: BTreeMap<String, String> =
            serde_html_form::from_bytes(&body).expect("form body parses");
        for (key, value) in &pairs {
            assert_eq!(parsed.get(key), Some(value));
        }
    }

    #[test]
    fn url_encode_applies_no_percent_encoding() {
        let body = url_encode(&params(&[("about", "bars & rings")]));
        assert_eq!(&body[..], b"about=bars & rings");
    }

    #[test]
    fn multipart_frames_every_part_with_the_fixed_boundary() {
        let files = vec![MediaFile {
            field: "photo".into(),
            filename: "ground.jpg".into(),
            mime: "image/jpeg".into(),
            data: Bytes::from_static(&[0xFF, 0xD8, 0xFF]),
        }];
        let body = multipart(&params(&[("name", "Bar Park"), ("city", "Riga")]), &files);
        let text = String::from_utf8_lossy(&body);

        assert!(text.starts_with("--FFF\r\n"));
        assert!(text.ends_with("--FFF--\r\n"));
        assert_eq!(text.matches("Content-Disposition: form-data;").count(), 3);
        assert!(text.contains("name=\"photo\"; filename=\"ground.jpg\""));
        assert!(text.contains("Content-Type: image/jpeg\r\n"));
    }

    #[test]
    fn multipart_orders_parameters_before_files() {
        let files = vec![MediaFile {
            field: "photo".into(),
            filename: "a.png".into(),
            mime: "image/png".into(),
            data: Bytes::from_static(b"png"),
        }];
        let body = multipart(&params(&[("name", "x")]), &files);
        let text = String::from_utf8_lossy(&body);

        let param_at = text.find("name=\"name\"").unwrap();
        let file_at = text.find("name=\"photo\"").unwrap();
        assert!(param_at < file_at);
    }

    #[test]
    fn multipart_with_no_parts_is_just_the_closing_marker() {
        let body = multipart(&[], &[]);
        assert_eq!(&body[..], b"--FFF--\r\n");
    }
}
