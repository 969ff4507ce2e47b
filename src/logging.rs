//! Tracing subscriber setup.
//!
//! In the browser, formatted events go to the devtools console, routed by
//! level. On the host they go to stderr and `RUST_LOG` wins over the
//! configured filter.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(filter: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();

        let _ = tracing_subscriber::fmt()
            .with_env_filter(parse_filter(filter))
            .with_writer(console::ConsoleMakeWriter)
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .try_init();
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| parse_filter(filter));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

/// Filter from a directive string, falling back to `info` when malformed
pub fn parse_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(target_arch = "wasm32")]
mod console {
    use std::io;
    use tracing::{Level, Metadata};
    use tracing_subscriber::fmt::MakeWriter;

    pub struct ConsoleMakeWriter;

    /// Buffers one formatted event and emits it on drop
    pub struct ConsoleWriter {
        level: Level,
        buf: Vec<u8>,
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for ConsoleWriter {
        fn drop(&mut self) {
            let text = String::from_utf8_lossy(&self.buf);
            let line = wasm_bindgen::JsValue::from_str(text.trim_end());
            match self.level {
                Level::ERROR => web_sys::console::error_1(&line),
                Level::WARN => web_sys::console::warn_1(&line),
                Level::INFO => web_sys::console::info_1(&line),
                _ => web_sys::console::log_1(&line),
            }
        }
    }

    impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
        type Writer = ConsoleWriter;

        fn make_writer(&'a self) -> Self::Writer {
            ConsoleWriter {
                level: Level::INFO,
                buf: Vec::new(),
            }
        }

        fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
            ConsoleWriter {
                level: *meta.level(),
                buf: Vec::new(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_parse_filter_accepts_directives() {
        let filter = parse_filter("page_glue=debug");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_parse_filter_falls_back() {
        let filter = parse_filter("page_glue=notalevel");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init("page_glue=debug");
        init("page_glue=trace");
        tracing::debug!("still alive");
    }
}
