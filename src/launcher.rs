use std::ffi::CString;
use std::io::{self, Write};
use std::ptr;

use log::{debug, warn};

use crate::error::ShellError;

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Exited(i32),
    Signaled(i32),
}

/// Runs `argv[0]` (searched on `PATH`) with `argv` as its arguments and blocks
/// until the child exits or is killed by a signal.
///
/// A program that cannot be executed is reported by the child itself, which then
/// exits with `EXIT_FAILURE`; the parent only sees a normal termination.
pub fn launch (argv: &[&str]) -> Result<Termination, ShellError> {
    // Everything the child needs is allocated before forking.
    let c_args = argv.iter()
        .map(|&arg| CString::new(arg))
        .collect::<Result<Vec<CString>, _>>()
        .map_err(|_| ShellError::NulInArgument)?;

    let Some(program) = c_args.first() else {
        return Err(ShellError::Spawn(io::Error::new(io::ErrorKind::InvalidInput, "empty command")));
    };

    let mut c_argv: Vec<*const libc::c_char> = c_args.iter()
        .map(|arg| arg.as_ptr())
        .collect();
    c_argv.push(ptr::null());

    // Buffered output would otherwise be flushed twice, once by each process.
    if let Err(err) = io::stdout().flush() {
        warn!("failed to flush stdout before fork: {err}");
    }

    let pid = unsafe { libc::fork() };

    match pid {
        0 => unsafe {
            // The runtime ignores SIGPIPE; programs expect the default.
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
            libc::execvp(program.as_ptr(), c_argv.as_ptr());

            libc::perror(c"minish".as_ptr());
            libc::_exit(libc::EXIT_FAILURE);
        },
        pid if pid > 0 => {
            debug!("spawned {} as pid {pid}", argv[0]);
            wait_for(pid)
        }
        _ => Err(ShellError::Spawn(io::Error::last_os_error())),
    }
}

/// Waits through stop and continue notifications until `pid` has terminated.
fn wait_for (pid: libc::pid_t) -> Result<Termination, ShellError> {
    loop {
        let mut status = 0;
        let reaped = unsafe { libc::waitpid(pid, &mut status, libc::WUNTRACED) };

        if reaped == -1 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(ShellError::Wait(err));
        }

        if libc::WIFEXITED(status) {
            return Ok(Termination::Exited(libc::WEXITSTATUS(status)));
        }

        if libc::WIFSIGNALED(status) {
            return Ok(Termination::Signaled(libc::WTERMSIG(status)));
        }

        debug!("pid {pid} stopped, still waiting");
    }
}
