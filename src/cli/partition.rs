/// Everything after this token is handed to the engine verbatim
pub const PASSTHROUGH_SEPARATOR: &str = "--";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionedArgs {
    pub service_names: Vec<String>,
    pub passthrough_args: Vec<String>,
}

/// Split the raw tokens following the subcommand into service names and the
/// verbatim passthrough tail. One left-to-right scan, no error conditions:
/// before the first `--`, flag-shaped tokens are dropped and everything else
/// is a service name (duplicates preserved); from `--` on, every token is
/// kept as-is, original quoting included.
pub fn partition_tokens(tokens: &[String]) -> PartitionedArgs {
    let mut partitioned = PartitionedArgs::default();
    let mut passthrough = false;

    for token in tokens {
        if passthrough {
            partitioned.passthrough_args.push(token.clone());
        } else if token == PASSTHROUGH_SEPARATOR {
            passthrough = true;
        } else if !token.starts_with('-') {
            partitioned.service_names.push(token.clone());
        }
    }

    partitioned
}

/// True when `flag` appears before the passthrough separator
pub fn has_flag(tokens: &[String], flag: &str) -> bool {
    tokens
        .iter()
        .take_while(|token| *token != PASSTHROUGH_SEPARATOR)
        .any(|token| token == flag)
}
