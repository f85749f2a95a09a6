use std::collections::BTreeMap;

use clap::Parser;
use quickstart_api::services::auth::TokenIssuer;

/// Mint a bearer token (HS256 compact JWT) accepted by the QuickStart API.
///
/// Uses the same shared secret as the server (`AUTH_CLIENT_SECRET`):
/// - `iss` / `sub` must match the server's AUTH_CLAIMS_ISSUER / AUTH_SUBJECT
/// - `--claim Admin=Admin` adds a role-style claim (repeatable)
/// - without `--ttl-seconds` the token carries no `exp`
#[derive(Parser, Debug)]
#[command(name = "token-gen", version, about)]
struct Args {
    /// Token issuer (iss)
    #[arg(long, default_value = "QuickStart")]
    issuer: String,

    /// Token subject (sub)
    #[arg(long, default_value = "QuickStart")]
    subject: String,

    /// Shared HMAC secret
    #[arg(long, env = "AUTH_CLIENT_SECRET", hide_env_values = true)]
    secret: String,

    /// Extra claim as key=value (repeatable)
    #[arg(long = "claim", value_name = "KEY=VALUE", value_parser = parse_claim)]
    claims: Vec<(String, String)>,

    /// Lifetime in seconds. Default: no expiry.
    #[arg(long)]
    ttl_seconds: Option<i64>,

    /// Print only the token
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

fn parse_claim(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    if key.trim().is_empty() {
        return Err(format!("empty claim name in '{}'", raw));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let issuer = TokenIssuer::new(args.issuer, args.subject, args.secret.as_bytes())?;
    let extra: BTreeMap<String, String> = args.claims.into_iter().collect();
    let ttl = args.ttl_seconds.map(chrono::Duration::seconds);

    let token = issuer.issue(&extra, ttl)?;

    if args.quiet {
        println!("{}", token);
        return Ok(());
    }

    println!("token: {}", token);
    println!("iss: {}", issuer.issuer());
    println!("sub: {}", issuer.subject());
    for (name, value) in &extra {
        println!("{}: {}", name, value);
    }
    match args.ttl_seconds {
        Some(ttl) => println!("expires in: {}s", ttl),
        None => println!("expires: never"),
    }
    println!("header: Authorization: Bearer {}", token);

    Ok(())
}
