use crate::error::{AppError, AppResult};
use url::Url;

pub const QR_SIZES: [u32; 3] = [100, 150, 200];
pub const DEFAULT_QR_SIZE: u32 = 200;

/// Public address of a card page.
pub fn build_card_url(public_base_url: &str, slug: &str) -> String {
    format!("{}/card/{}", public_base_url.trim_end_matches('/'), slug)
}

pub fn resolve_qr_size(size: Option<u32>) -> AppResult<u32> {
    match size {
        None => Ok(DEFAULT_QR_SIZE),
        Some(s) if QR_SIZES.contains(&s) => Ok(s),
        Some(s) => Err(AppError::ValidationError(format!(
            "Unsupported QR size {s}, expected one of 100, 150, 200"
        ))),
    }
}

/// Image URL on the external QR renderer encoding `data`.
pub fn build_qr_code_url(qr_base_url: &str, data: &str, size: u32) -> AppResult<String> {
    let dimensions = format!("{size}x{size}");
    let url = Url::parse_with_params(qr_base_url, &[("size", dimensions.as_str()), ("data", data)])
        .map_err(|e| AppError::InternalError(format!("Invalid QR base URL: {e}")))?;
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_url_ignores_trailing_slash() {
        assert_eq!(
            build_card_url("https://cards.example.com/", "ada-lovelace"),
            "https://cards.example.com/card/ada-lovelace"
        );
    }

    #[test]
    fn test_qr_size() {
        assert_eq!(resolve_qr_size(None).unwrap(), 200);
        assert_eq!(resolve_qr_size(Some(150)).unwrap(), 150);
        assert!(resolve_qr_size(Some(300)).is_err());
    }

    #[test]
    fn test_qr_url_encodes_card_url() {
        let url = build_qr_code_url(
            "https://api.qrserver.com/v1/create-qr-code/",
            "https://cards.example.com/card/ada-lovelace",
            150,
        )
        .unwrap();
        assert_eq!(
            url,
            "https://api.qrserver.com/v1/create-qr-code/?size=150x150&data=https%3A%2F%2Fcards.example.com%2Fcard%2Fada-lovelace"
        );
    }
}
