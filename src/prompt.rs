use std::env;
use std::ffi::CStr;
use std::path::Path;

const GREEN: &str = "\x1b[0;32m";
const RESET: &str = "\x1b[0;37m";

const HOSTNAME_MAX: usize = 256;

/// Renders `user@host:cwd$ `.
///
/// User and host are looked up once; the working directory is read on every
/// render. Anything that cannot be determined is left blank.
#[derive(Debug, Clone)]
pub struct Prompt {
    user: String,
    host: String,
    colored: bool,
}

impl Prompt {
    pub fn new (colored: bool) -> Self {
        Self {
            user: get_username().unwrap_or_default(),
            host: get_hostname().unwrap_or_default(),
            colored,
        }
    }

    pub fn render (&self) -> String {
        let cwd = env::current_dir()
            .map(|dir| abbreviate_home(&dir, env::var_os("HOME").as_deref().map(Path::new)))
            .unwrap_or_default();

        let identity = format!("{}@{}", self.user, self.host);

        if self.colored {
            format!("{GREEN}{identity}{RESET}:{cwd}$ ")
        } else {
            format!("{identity}:{cwd}$ ")
        }
    }
}

fn abbreviate_home (dir: &Path, home: Option<&Path>) -> String {
    if let Some(rest) = home.and_then(|home| dir.strip_prefix(home).ok()) {
        if rest.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~/{}", rest.display());
    }

    dir.display().to_string()
}

pub fn get_hostname () -> Option<String> {
    let mut buf = [0u8; HOSTNAME_MAX];

    unsafe {
        if libc::gethostname(buf.as_mut_ptr().cast(), buf.len()) != 0 {
            return None;
        }
    }

    // Truncated names are not guaranteed to be terminated.
    buf[HOSTNAME_MAX - 1] = 0;
    let name = CStr::from_bytes_until_nul(&buf).ok()?;
    Some(name.to_string_lossy().into_owned())
}

pub fn get_username () -> Option<String> {
    unsafe {
        let entry = libc::getpwuid(libc::getuid());
        if !entry.is_null() && !(*entry).pw_name.is_null() {
            return Some(CStr::from_ptr((*entry).pw_name).to_string_lossy().into_owned());
        }
    }

    env::var("USER").ok()
}
