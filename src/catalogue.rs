//! Catalogue of binaries known to allow shell escape or privilege escalation
//! when run through sudo.
//!
//! The catalogue is plain data injected into
//! [`RiskyBinariesRule`](crate::rules::risky_binaries::RiskyBinariesRule) at
//! construction; nothing in the engine mutates it. Configuration can extend or
//! trim the built-in [`BinaryCatalogue::gtfobins`] snapshot.

use std::collections::{BTreeMap, HashMap};

/// Snapshot of the GTFOBins `+sudo` list.
///
/// Source: <https://gtfobins.github.io/#+sudo>
const GTFOBINS_SUDO: &[&str] = &[
    // Shells and interpreters
    "ash", "bash", "csh", "dash", "elvish", "fish", "ksh", "lua", "make", "php", "perl", "python",
    "python2", "python3", "ruby", "rview", "rvim", "sash", "sh", "tclsh", "zsh", "wish", "expect",
    "jjs", "jrunscript", "gtester", "julia", "node", "npm", "ol", "scrot", "slsh", "soelim", "yash",
    // Editors and pagers
    "vi", "vim", "vimdiff", "view", "nano", "pico", "ed", "emacs", "joe", "less", "more", "man",
    "pg", "pic", "red", "ul", "pager", "most",
    // Network tools
    "aria2c", "arp", "curl", "wget", "fetch", "ftp", "lftp", "nc", "netcat", "nmap", "openssl",
    "socat", "ssh", "telnet", "tftp", "whois", "ip", "iftop", "tcpdump", "tshark",
    // Filesystem and archives
    "cp", "mv", "chmod", "chown", "chroot", "tar", "zip", "unzip", "gzip", "bzip2", "7z", "ar",
    "cpio", "dd", "find", "grep", "awk", "gawk", "mawk", "nawk", "sed", "jq", "cat", "base64",
    "base32", "diff", "fmt", "head", "tail", "hexdump", "od", "nl", "paste", "sort", "tee", "uniq",
    "xxd", "xz", "zsoelim",
    // System utilities
    "apt", "apt-get", "yum", "dnf", "dpkg", "rpm", "pkexec", "service", "systemctl", "journalctl",
    "dmesg", "snap", "task", "nice", "ionice", "strace", "ltrace", "gdb", "perf", "time",
    "timeout", "watch", "env", "busctl", "capsh", "choom", "column", "comm", "crash", "crontab",
    "dmsetup", "flock", "genisoimage", "git", "iconv", "install", "ksshell", "ld.so", "ldconfig",
    "logsave", "look", "mount", "msgfilt", "msgmerge", "msguniq", "multitime", "namei",
    "nfsstat", "nsenter", "pandoc", "pidstat", "pr", "ptx", "puppet", "readelf", "restic",
    "rlwrap", "rsync", "run-parts", "scanmem", "setarch", "shuf", "softlimit", "split", "sqlite3",
    "ss", "ssh-agent", "ssh-keygen", "ssh-keyscan", "start-stop-daemon", "stdbuf", "sysctl",
    "systemd-resolve", "tac", "taskset", "uudecode", "uuencode", "valgrind", "vigr", "vipw",
    "virsh", "volatility", "wall", "xargs", "xdotool", "xmodmap", "xmore", "xpad", "zipp",
    "zypper", "docker", "kubectl",
];

/// Immutable mapping from binary name to a reference URL explaining its risk.
///
/// Iteration is ordered by binary name, which keeps rule output
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryCatalogue {
    entries: BTreeMap<String, String>,
}

impl BinaryCatalogue {
    /// The built-in GTFOBins snapshot.
    ///
    /// ```
    /// use sudoers_audit::catalogue::BinaryCatalogue;
    ///
    /// let catalogue = BinaryCatalogue::gtfobins();
    /// assert_eq!(
    ///     catalogue.get("vim"),
    ///     Some("https://gtfobins.github.io/gtfobins/vim/#sudo")
    /// );
    /// ```
    pub fn gtfobins() -> Self {
        GTFOBINS_SUDO
            .iter()
            .map(|name| (name.to_string(), gtfobins_url(name)))
            .collect()
    }

    /// A catalogue with no entries; the risky-binary rule never fires with it.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns a copy with `extra` entries added, replacing existing URLs for
    /// names already present.
    pub fn with_extra(&self, extra: &HashMap<String, String>) -> Self {
        let mut entries = self.entries.clone();
        for (name, url) in extra {
            entries.insert(name.clone(), url.clone());
        }
        BinaryCatalogue { entries }
    }

    /// Returns a copy with the named entries removed.
    pub fn without(&self, names: &[String]) -> Self {
        let mut entries = self.entries.clone();
        for name in names {
            entries.remove(name);
        }
        BinaryCatalogue { entries }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterates `(name, url)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for BinaryCatalogue {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        BinaryCatalogue {
            entries: iter.into_iter().collect(),
        }
    }
}

fn gtfobins_url(name: &str) -> String {
    format!("https://gtfobins.github.io/gtfobins/{name}/#sudo")
}
