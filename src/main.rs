use std::env;
use std::process::ExitCode;

use wurl::{Url, UrlError};

const USAGE: &str = "usage: wurl <url> [--base <base>] [--set <component>=<value>]...";

struct Args {
    input: String,
    base: Option<String>,
    sets: Vec<(String, String)>,
}

fn parse_args() -> Result<Args, String> {
    let mut input = None;
    let mut base = None;
    let mut sets = Vec::new();
    let mut args = env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--base" => base = Some(args.next().ok_or("--base needs a value")?),
            "--set" => {
                let assignment = args.next().ok_or("--set needs a value")?;
                let (name, value) = assignment
                    .split_once('=')
                    .ok_or_else(|| format!("expected <component>=<value>, got {:?}", assignment))?;
                sets.push((name.to_string(), value.to_string()));
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ if input.is_none() => input = Some(arg),
            _ => return Err(format!("unexpected argument {:?}\n{}", arg, USAGE)),
        }
    }

    Ok(Args {
        input: input.ok_or(USAGE)?,
        base,
        sets,
    })
}

fn apply(url: &Url, name: &str, value: &str) -> Result<(), UrlError> {
    match name {
        "href" => url.set_href(value)?,
        "protocol" => url.set_protocol(value),
        "username" => url.set_username(value),
        "password" => url.set_password(value),
        "host" => url.set_host(value),
        "hostname" => url.set_hostname(value),
        "port" => url.set_port(value),
        "pathname" => url.set_pathname(value),
        "search" => url.set_search(value),
        "hash" => url.set_hash(value),
        _ => return Err(UrlError::TypeError(format!("unknown component {:?}", name))),
    }
    Ok(())
}

fn print_url(url: &Url) {
    println!("href      {}", url.href());
    println!("origin    {}", url.origin());
    println!("protocol  {}", url.protocol());
    println!("username  {}", url.username());
    println!("password  {}", url.password());
    println!("host      {}", url.host());
    println!("hostname  {}", url.hostname());
    println!("port      {}", url.port());
    println!("pathname  {}", url.pathname());
    println!("search    {}", url.search());
    println!("hash      {}", url.hash());

    let params = url.search_params();
    if params.size() > 0 {
        println!("params");
        for (name, value) in params.entries() {
            println!("  {:?} = {:?}", name, value);
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_target(false).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::from(2);
        }
    };

    let url = match Url::new(&args.input, args.base.as_deref()) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("✗ {}", e);
            return ExitCode::FAILURE;
        }
    };

    for (name, value) in &args.sets {
        if let Err(e) = apply(&url, name, value) {
            eprintln!("✗ {}", e);
            return ExitCode::FAILURE;
        }
    }

    print_url(&url);
    ExitCode::SUCCESS
}
