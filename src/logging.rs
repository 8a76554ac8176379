use std::sync::Once;

static INIT: Once = Once::new();

/// Installs the global env_logger. `filter` wins over `RUST_LOG`, which wins
/// over the `info` default. Later calls do nothing.
pub fn init_logging(filter: Option<&str>) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        match filter.map(str::to_owned).or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(spec) => builder.parse_filters(&spec),
            None => builder.filter_level(log::LevelFilter::Info),
        };
        // tests may have installed a logger already
        let _ = builder.try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_ignored() {
        init_logging(Some("duorast=debug"));
        init_logging(None);
        assert_eq!(log::max_level(), log::LevelFilter::Debug);
    }
}
