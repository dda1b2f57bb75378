/// Gateway prefix under which the generation service is mounted.
pub const API_MOUNT_PATH: &str = "/api/py";

/// True for a path rooted at the site root (`/files/x.pdf`).
///
/// Protocol-relative references (`//host/x.pdf`) name another host and are
/// not treated as root-relative.
pub fn is_root_relative(link: &str) -> bool {
    link.starts_with('/') && !link.starts_with("//")
}

/// Rewrites a root-relative download link so it resolves through the API
/// gateway. Absolute links pass through unchanged.
///
/// Links already under the mount path are left alone, so applying this more
/// than once never stacks the prefix. This departs from the web form, which
/// prefixed every `/` link: a server link of `/api/py/report.pdf` stays as is
/// here instead of becoming `/api/py/api/py/report.pdf`.
pub fn normalize_download_link(link: &str) -> String {
    normalize_with_mount(link, API_MOUNT_PATH)
}

/// Same as [`normalize_download_link`] for a gateway mounted elsewhere.
pub fn normalize_with_mount(link: &str, mount_path: &str) -> String {
    let trimmed = mount_path.trim_matches('/');
    if trimmed.is_empty() || !is_root_relative(link) {
        return link.to_string();
    }
    let mount = format!("/{trimmed}");
    if is_under_mount(link, &mount) {
        return link.to_string();
    }
    format!("{mount}{link}")
}

fn is_under_mount(link: &str, mount: &str) -> bool {
    match link.strip_prefix(mount) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'),
        None => false,
    }
}
