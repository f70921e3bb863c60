//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`StoragePort`]: partition lifecycle plus the persisted
//! [`SystemConfig`] blob.
//!
//! Corruption handling follows the standard ESP-IDF recipe: when
//! `nvs_flash_init` reports no free pages or a new layout version, the
//! adapter surfaces [`StorageError::Corrupted`] and the controller
//! erases the partition and retries exactly once.
//!
//! Config blobs are `postcard`-encoded; a missing blob loads as defaults.

use log::{info, warn};

use crate::app::ports::StoragePort;
use crate::config::SystemConfig;
use crate::error::StorageError;

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

const CONFIG_NAMESPACE: &str = "wifiprov";
#[allow(dead_code)]
const MAX_BLOB_SIZE: usize = 512;

pub struct NvsAdapter {
    #[cfg(not(target_os = "espidf"))]
    store: std::cell::RefCell<HashMap<String, Vec<u8>>>,
    #[cfg(not(target_os = "espidf"))]
    sim_corrupted: bool,
}

impl NvsAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            store: std::cell::RefCell::new(HashMap::new()),
            #[cfg(not(target_os = "espidf"))]
            sim_corrupted: false,
        }
    }

    /// Simulation only: make the next `init()` report corruption.
    #[cfg(not(target_os = "espidf"))]
    pub fn corrupt(&mut self) {
        self.sim_corrupted = true;
    }

    /// Open an NVS namespace, execute a closure with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(namespace: &str, write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let mut ns_buf = [0u8; 16];
        let ns_bytes = namespace.as_bytes();
        let len = ns_bytes.len().min(15);
        ns_buf[..len].copy_from_slice(&ns_bytes[..len]);

        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let ret = unsafe { nvs_open(ns_buf.as_ptr() as *const _, mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }

        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }
}

impl Default for NvsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// StoragePort — device
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
impl StoragePort for NvsAdapter {
    fn init(&mut self) -> Result<(), StorageError> {
        // SAFETY: nvs_flash_init is called from the single main-task
        // context before any concurrent NVS access.
        let ret = unsafe { nvs_flash_init() };
        if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
            return Err(StorageError::Corrupted);
        }
        if ret != ESP_OK {
            return Err(StorageError::IoError);
        }
        info!("NvsAdapter: ESP-IDF NVS initialised");
        Ok(())
    }

    fn erase(&mut self) -> Result<(), StorageError> {
        // SAFETY: same single main-task context as init().
        let ret = unsafe { nvs_flash_erase() };
        if ret != ESP_OK {
            return Err(StorageError::IoError);
        }
        warn!("NvsAdapter: flash partition erased");
        Ok(())
    }

    fn load_config(&self) -> Result<SystemConfig, StorageError> {
        let result = Self::with_nvs_handle(CONFIG_NAMESPACE, false, |handle| {
            let key_cstr = b"syscfg\0";
            let mut size: usize = 0;

            // First call: get size.
            let ret = unsafe {
                nvs_get_blob(
                    handle,
                    key_cstr.as_ptr() as *const _,
                    core::ptr::null_mut(),
                    &mut size,
                )
            };
            if ret == ESP_ERR_NVS_NOT_FOUND {
                return Err(ESP_ERR_NVS_NOT_FOUND);
            }
            if ret != ESP_OK || size == 0 || size > MAX_BLOB_SIZE {
                return Err(ret);
            }

            let mut buf = vec![0u8; size];
            let ret = unsafe {
                nvs_get_blob(
                    handle,
                    key_cstr.as_ptr() as *const _,
                    buf.as_mut_ptr() as *mut _,
                    &mut size,
                )
            };
            if ret != ESP_OK {
                return Err(ret);
            }
            Ok(buf)
        });

        match result {
            Ok(bytes) => {
                let cfg: SystemConfig =
                    postcard::from_bytes(&bytes).map_err(|_| StorageError::Corrupted)?;
                info!("NvsAdapter: loaded config from NVS ({} bytes)", bytes.len());
                Ok(cfg)
            }
            Err(e) if e == ESP_ERR_NVS_NOT_FOUND => {
                info!("NvsAdapter: no stored config, using defaults");
                Ok(SystemConfig::default())
            }
            Err(e) => {
                warn!("NvsAdapter: NVS read error {e}, using defaults");
                Ok(SystemConfig::default())
            }
        }
    }

    fn save_config(&mut self, config: &SystemConfig) -> Result<(), StorageError> {
        config.validate().map_err(StorageError::InvalidConfig)?;
        let bytes = postcard::to_allocvec(config).map_err(|_| StorageError::IoError)?;
        let result = Self::with_nvs_handle(CONFIG_NAMESPACE, true, |handle| {
            let key_cstr = b"syscfg\0";
            let ret = unsafe {
                nvs_set_blob(
                    handle,
                    key_cstr.as_ptr() as *const _,
                    bytes.as_ptr() as *const _,
                    bytes.len(),
                )
            };
            if ret != ESP_OK {
                return Err(ret);
            }
            let ret = unsafe { nvs_commit(handle) };
            if ret != ESP_OK {
                return Err(ret);
            }
            Ok(())
        });
        match result {
            Ok(()) => {
                info!("NvsAdapter: config saved to NVS ({} bytes)", bytes.len());
                Ok(())
            }
            Err(e) => {
                warn!("NvsAdapter: NVS write error {e}");
                Err(StorageError::IoError)
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// StoragePort — host simulation
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
impl StoragePort for NvsAdapter {
    fn init(&mut self) -> Result<(), StorageError> {
        if self.sim_corrupted {
            return Err(StorageError::Corrupted);
        }
        info!("NvsAdapter: simulation backend initialised");
        Ok(())
    }

    fn erase(&mut self) -> Result<(), StorageError> {
        self.store.borrow_mut().clear();
        self.sim_corrupted = false;
        warn!("NvsAdapter: simulation store erased");
        Ok(())
    }

    fn load_config(&self) -> Result<SystemConfig, StorageError> {
        let key = format!("{CONFIG_NAMESPACE}::syscfg");
        if let Some(bytes) = self.store.borrow().get(&key) {
            let cfg: SystemConfig =
                postcard::from_bytes(bytes).map_err(|_| StorageError::Corrupted)?;
            info!("NvsAdapter: loaded config from store");
            Ok(cfg)
        } else {
            info!("NvsAdapter: no stored config, using defaults");
            Ok(SystemConfig::default())
        }
    }

    fn save_config(&mut self, config: &SystemConfig) -> Result<(), StorageError> {
        config.validate().map_err(StorageError::InvalidConfig)?;
        let key = format!("{CONFIG_NAMESPACE}::syscfg");
        let bytes = postcard::to_allocvec(config).map_err(|_| StorageError::IoError)?;
        self.store.borrow_mut().insert(key, bytes);
        info!("NvsAdapter: config saved (simulation)");
        Ok(())
    }
}
