//! QR image rendering

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use qrcall_core::{QrCallError, Result};
use qrcode::render::svg;
use qrcode::QrCode;

/// Renders redemption URLs as SVG QR codes embedded in `data:` URLs
#[derive(Debug, Clone)]
pub struct QrRenderer {
    min_dimension: u32,
}

impl QrRenderer {
    pub fn new(min_dimension: u32) -> Self {
        Self { min_dimension }
    }

    pub fn render_svg(&self, data: &str) -> Result<String> {
        let code = QrCode::new(data.as_bytes()).map_err(|e| QrCallError::Rendering(e.to_string()))?;
        Ok(code
            .render::<svg::Color<'_>>()
            .min_dimensions(self.min_dimension, self.min_dimension)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#ffffff"))
            .build())
    }

    pub fn render_data_url(&self, data: &str) -> Result<String> {
        let image = self.render_svg(data)?;
        Ok(format!("data:image/svg+xml;base64,{}", STANDARD.encode(image)))
    }
}

impl Default for QrRenderer {
    fn default() -> Self {
        Self::new(240)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_data_url() {
        let url = QrRenderer::default()
            .render_data_url("https://example.com/call/KzE0MTU1NTUwMDAw.QWxpY2U.1714566600000")
            .unwrap();
        assert!(url.starts_with("data:image/svg+xml;base64,"));

        let payload = url.trim_start_matches("data:image/svg+xml;base64,");
        let svg = String::from_utf8(STANDARD.decode(payload).unwrap()).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_oversized_payload_is_a_rendering_error() {
        let data = "x".repeat(8000);
        let err = QrRenderer::default().render_data_url(&data).unwrap_err();
        assert_eq!(err.error_code(), "RENDERING_ERROR");
    }
}
