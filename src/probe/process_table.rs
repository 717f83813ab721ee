use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PORT_MAPPING: Regex = Regex::new(r"^(\d{1,5}):(\d{1,5})$").unwrap();
}

fn references_namespace(tokens: &[&str], namespace: &str) -> bool {
    let suffix = format!("={}", namespace);
    tokens
        .iter()
        .any(|t| *t == namespace || t.ends_with(&suffix))
}

/// Local port of a port-forward command line referencing `namespace`,
/// taken from its `localPort:remotePort` argument.
pub fn forwarded_port(command_line: &str, namespace: &str) -> Option<u16> {
    let tokens: Vec<&str> = command_line.split_whitespace().collect();
    if !tokens.contains(&"port-forward") || !references_namespace(&tokens, namespace) {
        return None;
    }
    tokens
        .iter()
        .find_map(|t| PORT_MAPPING.captures(t))
        .and_then(|caps| caps[1].parse::<u16>().ok())
}

/// First match in process-table order wins.
pub fn find_forwarded_port<'a, I>(command_lines: I, namespace: &str) -> Option<u16>
where
    I: IntoIterator<Item = &'a str>,
{
    command_lines
        .into_iter()
        .find_map(|line| forwarded_port(line, namespace))
}
