use std::path::PathBuf;

/// Name of the locally run, disposable network.
pub const SANDBOX_NETWORK: &str = "sandbox";

const DEFAULT_OCTEZ_CLIENT: &str = "octez-client";

pub fn is_sandbox(network: &str) -> bool {
    network == SANDBOX_NETWORK
}

/// Root directory for tznft's local state (`TZNFT_HOME`, default `~/.tznft`).
pub fn tznft_home() -> PathBuf {
    std::env::var("TZNFT_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".tznft")
        })
}

/// Per-network key store for the execution engine.
pub fn octez_base_dir(home: &std::path::Path, network: &str) -> PathBuf {
    home.join("octez-client").join(network)
}

pub fn octez_client_binary() -> String {
    std::env::var("TZNFT_OCTEZ_CLIENT")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_OCTEZ_CLIENT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_sandbox() {
        assert!(is_sandbox("sandbox"));
        assert!(!is_sandbox("testnet"));
        assert!(!is_sandbox("Sandbox"));
    }

    #[test]
    fn test_octez_base_dir_is_network_scoped() {
        let home = PathBuf::from("/tmp/tznft");
        assert_ne!(
            octez_base_dir(&home, "sandbox"),
            octez_base_dir(&home, "testnet")
        );
    }
}
