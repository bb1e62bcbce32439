#![deny(warnings)]
pub mod grid;
pub mod maze;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "tombstone"
    }

    pub const fn codename() -> &'static str {
        "Tombstone Maze"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::AppInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(AppInfo::name(), "tombstone");
        assert_eq!(AppInfo::codename(), "Tombstone Maze");
        assert!(!AppInfo::version().is_empty());
    }
}
