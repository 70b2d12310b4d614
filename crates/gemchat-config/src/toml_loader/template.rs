//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# gemchat configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[model]
# name = "gemini-2.5-flash"
# system_instruction = "Answer briefly."
# temperature = 1.0          # 0.0-2.0, unset = model default
# max_output_tokens = 2048   # 1-65536, unset = model default

[api]
# base_url = "https://generativelanguage.googleapis.com/v1beta/models"
# connect_timeout_secs = 10  # 1-120
# request_timeout_secs = 120 # 1-600

[session]
# greeting = "👋 Gemini helper here, let's chat!"   # empty = no greeting
# starter = "Hi! Chat with me!"                     # sent on an empty first line
# suggestions = ["Describe the attached image", "Translate into Chinese: Hello!", "Write a short poem"]

[credentials]
# remember = true            # keep the API key between runs
# key_name = "gemini_api_key"

[attachments]
# max_file_size_mb = 5       # 1-20

[logging]
# level = "INFO"             # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
