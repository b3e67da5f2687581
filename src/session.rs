use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Representation type negotiated with TYPE: it only controls the line
/// ending used when the server emits line-oriented data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Ascii,
    Image,
}

impl Representation {
    /// Maps the TYPE argument to a representation. Anything but the two
    /// supported codes is rejected by the caller with a 504.
    pub fn from_type_code(code: &str) -> Option<Self> {
        match code {
            "A" => Some(Representation::Ascii),
            "I" => Some(Representation::Image),
            _ => None,
        }
    }

    pub fn line_ending(self) -> &'static str {
        match self {
            Representation::Ascii => "\r\n",
            Representation::Image => "\n",
        }
    }
}

/// Per-connection state. One instance is created per accepted control
/// connection and never shared with another connection.
#[derive(Debug)]
pub struct Session {
    // The working directory is kept in two forms that must stay in step:
    // `absolute_dir` is always the filesystem-resolved form of
    // `current_dir`. Mutation goes through `commit_working_dir` so a failed
    // CWD leaves both untouched.
    current_dir: PathBuf,
    absolute_dir: PathBuf,
    pub representation: Representation,
    pub data_peer: Option<SocketAddr>,
}

impl Session {
    pub fn new(root: PathBuf, root_absolute: PathBuf) -> Self {
        Self {
            current_dir: root,
            absolute_dir: root_absolute,
            representation: Representation::Ascii,
            data_peer: None,
        }
    }

    /// The working directory in its relative form, used to resolve command
    /// arguments.
    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    /// The resolved absolute form of the working directory, reported by PWD.
    pub fn absolute_dir(&self) -> &Path {
        &self.absolute_dir
    }

    /// Joins a client-supplied path onto the working directory. Leading
    /// slashes are stripped first, so an absolute-looking argument stays
    /// anchored to the working directory instead of replacing it wholesale;
    /// `..` components are left for the filesystem to resolve.
    pub fn resolve_path(&self, arg: &str) -> PathBuf {
        self.current_dir.join(arg.trim_start_matches('/'))
    }

    /// Installs a new working directory. The caller has already resolved
    /// `absolute` from `relative` and verified it exists; calling this with
    /// an unresolved pair would break the PWD invariant.
    pub fn commit_working_dir(&mut self, relative: PathBuf, absolute: PathBuf) {
        self.current_dir = relative;
        self.absolute_dir = absolute;
    }
}
