use std::env::split_paths;
use std::fs;
use std::io::{self, Write};
use std::os::fd::RawFd;
use std::process;

use log::warn;

/// Reports an allocation failure and terminates the whole process.
///
/// Only growing the line or token buffer can get here.
pub fn allocation_failure () -> ! {
    let _ = writeln!(io::stderr(), "minish: allocation error");
    process::exit(libc::EXIT_FAILURE);
}

pub fn is_terminal (fd: RawFd) -> bool {
    unsafe { libc::isatty(fd) == 1 }
}

/// Every file name found in the directories of `$PATH`, duplicates included.
pub fn get_system_binaries () -> Vec<String> {
    let Some(path) = std::env::var_os("PATH") else {
        return Vec::new();
    };

    let mut res = Vec::new();

    for dir in split_paths(&path) {
        let Ok(entries) = fs::read_dir(&dir) else { continue };

        res.extend(
            entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.file_name().to_string_lossy().to_string())
        );
    }

    res
}

/// Puts a terminal into non-canonical, no-echo mode until dropped.
pub struct RawMode {
    fd: RawFd,
    original: libc::termios,
}

impl RawMode {
    pub fn enable (fd: RawFd) -> Option<Self> {
        use libc::{ TCSANOW, VMIN, ECHO, ICANON, VTIME };

        unsafe {
            let mut term: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &mut term) != 0 {
                warn!("tcgetattr failed on fd {fd}: {}", io::Error::last_os_error());
                return None;
            }

            let original = term;

            term.c_lflag &= !(ICANON | ECHO);
            term.c_cc[VMIN] = 1;
            term.c_cc[VTIME] = 0;

            if libc::tcsetattr(fd, TCSANOW, &term) != 0 {
                warn!("tcsetattr failed on fd {fd}: {}", io::Error::last_os_error());
                return None;
            }

            Some(Self { fd, original })
        }
    }
}

impl Drop for RawMode {
    fn drop (&mut self) {
        unsafe {
            libc::tcsetattr(self.fd, libc::TCSANOW, &self.original);
        }
    }
}
