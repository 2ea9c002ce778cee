pub mod storage_watcher;
