/// Hides credentials and everything after the host, where recognition services keep their keys.
pub fn mask_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return "***".to_string();
    };
    let authority_start = scheme_end + 3;
    let scheme = &url[..authority_start];
    let rest = &url[authority_start..];
    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let host_start = rest[..authority_end].rfind('@').map_or(0, |at| at + 1);
    let host = &rest[host_start..authority_end];

    if authority_end + 1 < rest.len() {
        format!("{scheme}{host}/***")
    } else {
        format!("{scheme}{host}{}", &rest[authority_end..])
    }
}

/// Collapses runs of whitespace so feed text reads cleanly when spoken or printed.
pub fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
