use std::path::{Component, Path, PathBuf};

/// Express `path` relative to `base`, lexically.
///
/// Both paths must be of the same kind (both absolute or both relative).
/// Returns `None` when no relative form exists, e.g. when `base` still has
/// `..` components after the common prefix.
pub fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    if path.is_absolute() != base.is_absolute() {
        return None;
    }

    let path: Vec<Component<'_>> = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let base: Vec<Component<'_>> = base
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    let common = path
        .iter()
        .zip(base.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = PathBuf::new();
    for component in &base[common..] {
        match component {
            Component::Normal(_) => out.push(".."),
            _ => return None,
        }
    }
    for component in &path[common..] {
        out.push(component.as_os_str());
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    Some(out)
}
