use std::collections::HashSet;

/// Placeholder tree for a repository with no listed files
pub const EMPTY_TREE: &str = "(empty)\n";

/// Render an indented listing of `/`-separated relative paths.
///
/// The repository name is the root line. Each directory is printed once,
/// the first time it is seen, two spaces deeper than its parent; files sit
/// one level below their directory. Paths are sorted before rendering, so
/// the output does not depend on input order.
pub fn render_file_tree<'a, I>(repo_name: &str, paths: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut sorted: Vec<&str> = paths.into_iter().collect();
    if sorted.is_empty() {
        return EMPTY_TREE.to_string();
    }
    sorted.sort_unstable();

    let mut lines = vec![format!("{repo_name}/")];
    let mut seen_dirs: HashSet<&str> = HashSet::new();

    for path in sorted {
        let parts: Vec<&str> = path.split('/').collect();
        let Some((file, dirs)) = parts.split_last() else {
            continue;
        };

        let mut prefix_end = 0;
        for (depth, dir) in dirs.iter().enumerate() {
            prefix_end += dir.len() + usize::from(depth > 0);
            if seen_dirs.insert(&path[..prefix_end]) {
                lines.push(format!("{}{dir}/", "  ".repeat(depth + 1)));
            }
        }
        lines.push(format!("{}{file}", "  ".repeat(parts.len())));
    }

    let mut tree = lines.join("\n");
    tree.push('\n');
    tree
}
