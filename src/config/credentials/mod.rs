use super::schema::Config;

macro_rules! define_credentials {
    ($( $name:literal, $env:literal => $($path:ident).+ );* $(;)?) => {
        /// All known credential slot names.
        pub const CREDENTIAL_NAMES: &[&str] = &[$($name),*];

        /// (slot name, env var name) pairs.
        pub const CREDENTIAL_ENV_VARS: &[(&str, &str)] = &[$(($name, $env)),*];

        /// Get the current value of a credential field by slot name.
        pub fn get_credential_value<'a>(config: &'a Config, name: &str) -> Option<&'a str> {
            match name {
                $($name => Some(config.$($path).+.as_str()),)*
                _ => None,
            }
        }

        /// Apply environment variable overrides.
        ///
        /// Any of these env vars that is set and non-empty will overwrite the
        /// corresponding config field, allowing secrets to be injected without
        /// touching the config file (useful for containers and CI).
        pub fn apply_env_overrides(config: &mut Config) {
            $(
                if let Ok(val) = std::env::var($env) {
                    if !val.is_empty() {
                        config.$($path).+ = val;
                    }
                }
            )*
        }
    };
}

define_credentials! {
    "misskey-webhook-secret",  "MISSKEY_WEBHOOK_SECRET"  => misskey.webhook_secret;
    "twitter-auth-token",      "TWITTER_AUTH_TOKEN"      => twitter.auth_token;
    "twitter-ct0",             "TWITTER_CT0"             => twitter.ct0;
}

/// Detect where a credential value came from, for `noterelay check-config`.
pub fn detect_source(name: &str, config: &Config) -> &'static str {
    let env_var = CREDENTIAL_ENV_VARS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, e)| *e);

    if let Some(var) = env_var
        && let Ok(val) = std::env::var(var)
        && !val.is_empty()
    {
        return "env";
    }

    if let Some(val) = get_credential_value(config, name)
        && !val.is_empty()
    {
        return "config";
    }

    "[empty]"
}

/// Serializes tests that mutate the process environment.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
