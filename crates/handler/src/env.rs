use model::env::{TABLE_NAME, TRACE_ID, TRACE_ID_FALLBACK};

/// Environment values read at the start of every invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationEnv {
    pub table_name: Option<String>,
    pub trace_id: String,
}

impl InvocationEnv {
    pub fn from_env() -> Self {
        InvocationEnv {
            table_name: std::env::var(TABLE_NAME).ok(),
            trace_id: std::env::var(TRACE_ID).unwrap_or_else(|_| TRACE_ID_FALLBACK.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{setup_default_env, TEST_TABLE, TEST_TRACE_ID};

    #[test]
    fn env_is_read_from_process() {
        setup_default_env();

        let env: InvocationEnv = InvocationEnv::from_env();

        assert_eq!(Some(TEST_TABLE.to_string()), env.table_name);
        assert_eq!(TEST_TRACE_ID, env.trace_id);
    }
}
