use crate::host::{Host, Identity};

/// Renders `<user>:~/<cwd basename> $ `.
///
/// The real (not effective) user is shown. Missing pieces render as empty
/// strings rather than failing the prompt.
pub fn render(host: &dyn Host) -> String {
    let user = host.user_name(Identity::Real).ok().flatten().unwrap_or_default();
    let base = match host.current_dir() {
        Ok(dir) => match dir.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => dir.display().to_string(),
        },
        Err(_) => String::new(),
    };
    format!("{}:~/{} $ ", user, base)
}
