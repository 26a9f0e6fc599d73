//! Lifetime control for the resolver subprocess
//!
//! The resolver stays in our process group, so a Ctrl-C at the terminal
//! reaches it directly. On Linux it is additionally tied to our lifetime with
//! `PR_SET_PDEATHSIG`, which covers the case where only this tool is killed.

/// Extension trait tying a `Command`'s child to the lifetime of this process
pub trait CommandParentDeath {
    /// Ask the kernel to send SIGTERM to the child when this process exits.
    /// A no-op outside Linux.
    fn dies_with_parent(&mut self) -> &mut Self;
}

impl CommandParentDeath for std::process::Command {
    #[cfg(target_os = "linux")]
    fn dies_with_parent(&mut self) -> &mut Self {
        use std::os::unix::process::CommandExt;
        // SAFETY: prctl and reading errno are async-signal-safe, and
        // last_os_error does not allocate
        unsafe {
            self.pre_exec(|| {
                if nix::libc::prctl(nix::libc::PR_SET_PDEATHSIG, nix::libc::SIGTERM) == -1 {
                    return Err(std::io::Error::last_os_error());
                }
                Ok(())
            });
        }
        self
    }

    #[cfg(not(target_os = "linux"))]
    fn dies_with_parent(&mut self) -> &mut Self {
        self
    }
}
