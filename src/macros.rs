/// Next value of a per-call-site counter, starting at 1.
macro_rules! auto_increment {
    () => {{
        use std::sync::atomic::{AtomicU64, Ordering};

        static COUNTER: AtomicU64 = AtomicU64::new(1);
        COUNTER.fetch_add(1, Ordering::Relaxed)
    }};
}

pub(crate) use auto_increment;
