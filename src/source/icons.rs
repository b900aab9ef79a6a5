use crate::controller::{IconDelivery, IconFetcher};
use crate::rows::Icon;
use crate::utils::host_of;

/// Terminal stand-in for favicons: the first letter of the site's host.
///
/// Delivers right away; the controller applies it on its next tick.
#[derive(Debug, Default)]
pub struct GlyphIconFetcher;

impl IconFetcher for GlyphIconFetcher {
    fn fetch(&mut self, url: &str, _size_hint: u16, delivery: IconDelivery) {
        let Some(glyph) = glyph_for(url) else {
            tracing::trace!(url, "no host to derive an icon from");
            return;
        };
        delivery.deliver(Icon { glyph });
    }
}

pub fn glyph_for(url: &str) -> Option<String> {
    let host = host_of(url)?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    host.chars().find(|c| c.is_alphanumeric()).map(|c| c.to_uppercase().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_for_host() {
        assert_eq!(glyph_for("https://www.wikipedia.org/wiki/Cat"), Some("W".to_string()));
        assert_eq!(glyph_for("https://ñandu.example"), Some("Ñ".to_string()));
        assert_eq!(glyph_for("not a url"), None);
    }
}
