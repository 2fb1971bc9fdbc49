/// Comma or newline separated items, trimmed, empties and repeats dropped,
/// first appearance kept.
pub fn extract_skills(text: &str) -> Vec<String> {
    let mut skills: Vec<String> = Vec::new();
    for item in text.split([',', '\n']).map(str::trim) {
        if !item.is_empty() && !skills.iter().any(|s| s == item) {
            skills.push(item.to_string());
        }
    }
    skills
}
