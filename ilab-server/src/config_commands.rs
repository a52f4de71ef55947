use anyhow::Result;
use colored::Colorize;

use ilab_core::GatewayConfig;

pub fn show_config(json: bool) -> Result<()> {
    let mut config = GatewayConfig::from_env()?;
    config.analytics.umami_key = mask_key(&config.analytics.umami_key);
    config.analytics.segment_key = mask_key(&config.analytics.segment_key);

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}", "Upstreams:".cyan().bold());
    println!("  API server:  {}", config.api_server_url);
    println!("  Collections: {}", config.collections_url);
    println!("  Checkpoints: {}", config.checkpoints_url);
    println!("  Timeout:     {}s", config.upstream_timeout_secs);

    println!("{}", "Taxonomy:".cyan().bold());
    println!("  Checkout: {}", config.taxonomy_dir().display());

    println!("{}", "UI bundle:".cyan().bold());
    match &config.static_dir {
        Some(dir) => println!("  Static dir: {}", dir.display()),
        None => println!("  Static dir: {}", "(API only)".dimmed()),
    }

    println!("{}", "Analytics:".cyan().bold());
    println!("  Providers:   {}", config.analytics.active_providers.join(", "));
    println!("  Verbose:     {}", config.analytics.verbose);
    println!("  Umami key:   {}", config.analytics.umami_key);
    println!("  Segment key: {}", config.analytics.segment_key);

    println!("{}", "Deployment:".cyan().bold());
    println!("  Type:           {}", or_unset(&config.deployment.deployment_type));
    println!("  Endpoint proxy: {}", or_unset(&config.deployment.endpoint_proxy));
    println!(
        "  Taxonomy repo:  {}/{}",
        or_unset(&config.deployment.upstream_repo_owner),
        or_unset(&config.deployment.upstream_repo_name)
    );
    Ok(())
}

fn or_unset(value: &str) -> String {
    if value.is_empty() {
        "(unset)".dimmed().to_string()
    } else {
        value.to_string()
    }
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key(""), "");
        assert_eq!(mask_key("short"), "*****");
        assert_eq!(mask_key("abcd1234efgh"), "abcd...efgh");
    }
}
