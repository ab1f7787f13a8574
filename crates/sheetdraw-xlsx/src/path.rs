//! OPC part-name helpers.

/// Relationships part name for a given part (`xl/drawings/drawing1.xml` ->
/// `xl/drawings/_rels/drawing1.xml.rels`).
pub fn rels_for_part(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file_name)) => format!("{dir}/_rels/{file_name}.rels"),
        None => format!("_rels/{part}.rels"),
    }
}

/// Resolve a relationship target against the part it was declared on.
///
/// Targets are URIs and may be relative (`../media/image1.png`), absolute
/// (`/xl/media/image1.png`), or carry a fragment; OPC part names have
/// neither fragments nor `.`/`..` segments.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    let target = target.split('#').next().unwrap_or(target);
    if target.is_empty() {
        return normalize(source_part);
    }
    if let Some(target) = target.strip_prefix('/') {
        return normalize(target);
    }

    let base_dir = source_part.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
    normalize(&format!("{base_dir}/{target}"))
}

/// Media file name for a resolved target path (`xl/media/image1.png` ->
/// `image1.png`).
pub fn media_file_name(target_path: &str) -> &str {
    target_path
        .strip_prefix("xl/media/")
        .or_else(|| target_path.strip_prefix("media/"))
        .unwrap_or(target_path)
}

fn normalize(path: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rels_for_part_in_subdir() {
        assert_eq!(
            rels_for_part("xl/drawings/drawing1.xml"),
            "xl/drawings/_rels/drawing1.xml.rels"
        );
    }

    #[test]
    fn rels_for_part_in_root() {
        assert_eq!(rels_for_part("drawing1.xml"), "_rels/drawing1.xml.rels");
    }

    #[test]
    fn resolve_target_relative_to_source_dir() {
        assert_eq!(
            resolve_target("xl/drawings/drawing1.xml", "../media/image1.png"),
            "xl/media/image1.png"
        );
    }

    #[test]
    fn resolve_target_absolute() {
        assert_eq!(
            resolve_target("xl/drawings/drawing1.xml", "/xl/media/image2.png"),
            "xl/media/image2.png"
        );
    }

    #[test]
    fn resolve_target_strips_fragment() {
        assert_eq!(
            resolve_target("xl/drawings/drawing1.xml", "../media/image1.png#frag"),
            "xl/media/image1.png"
        );
    }

    #[test]
    fn media_file_name_strips_media_prefix() {
        assert_eq!(media_file_name("xl/media/image1.png"), "image1.png");
        assert_eq!(media_file_name("media/image1.png"), "image1.png");
        assert_eq!(media_file_name("image1.png"), "image1.png");
    }
}
