/// Convert a URL to a sanitized filename
pub fn sanitize_filename(url: &str) -> String {
    // Remove protocol and replace invalid filename characters
    let mut name = url.replace("http://", "").replace("https://", "");
    name = name.replace(['/', ':', '?', '&', '=', '#', '%'], "_");

    // Limit filename length
    if name.len() > 100 {
        name[..100].to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_protocol_and_replaces_separators() {
        assert_eq!(
            sanitize_filename("https://example.com/docs/page?x=1"),
            "example.com_docs_page_x_1"
        );
    }

    #[test]
    fn truncates_long_names() {
        let url = format!("https://example.com/{}", "a".repeat(200));
        assert_eq!(sanitize_filename(&url).len(), 100);
    }
}
