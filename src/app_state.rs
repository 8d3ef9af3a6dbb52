use crate::config::Config;
use crate::store::FileStore;

#[derive(Clone)]
pub struct AppState {
    pub store: FileStore,
    pub config: Config,
}

#[cfg(test)]
pub fn test_state(dir: &std::path::Path) -> AppState {
    let config = Config {
        data_dir: dir.join("db"),
        export_dir: dir.join("out"),
        bind_addr: "127.0.0.1:0".to_string(),
        frontend_origin: "http://localhost:3000".to_string(),
    };
    let store = FileStore::new(&config.data_dir).expect("test data dir");
    AppState { store, config }
}
