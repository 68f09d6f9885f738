use anyhow::{anyhow, Context, Result};
use colored::*;
use reqwest::{Client, Method};
use serde_json::{json, Value};
use std::io::{self, Write};

#[tokio::main]
async fn main() -> Result<()> {
    println!("{}", "🚚 TruXtoK Testing Tool".bright_blue().bold());
    println!("{}", "=======================".bright_blue());
    println!();

    let base_url = std::env::var("TRUXTOK_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    println!("{} {}", "🌐 API:".bright_blue(), base_url);

    let client = Client::new();
    check_health(&client, &base_url).await?;

    let credentials = get_credentials()?;
    let session = Session {
        token: authenticate(&client, &base_url, &credentials).await?,
        base_url,
        client,
    };

    loop {
        println!();
        println!("{}", "📋 MAIN MENU".bright_green().bold());
        println!("{}", "============".bright_green());
        println!("1. 🚛 List my trucks");
        println!("2. 🗃️  List the bins of a truck");
        println!("3. 📦 Show a bin");
        println!("4. ✏️  Set an item quantity in a bin");
        println!("5. 💳 Show my credit ledger");
        println!("6. 🚪 Exit");

        match prompt("Choose an option (1-6): ")?.as_str() {
            "1" => session.show(Method::GET, "/api/technician/trucks", None).await?,
            "2" => {
                let truck_id = prompt("Truck id: ")?;
                session
                    .show(Method::GET, &format!("/api/technician/trucks/{}/bins", truck_id), None)
                    .await?
            }
            "3" => {
                let truck_id = prompt("Truck id: ")?;
                let bin_id = prompt("Bin id: ")?;
                session
                    .show(
                        Method::GET,
                        &format!("/api/technician/trucks/{}/bins/{}", truck_id, bin_id),
                        None,
                    )
                    .await?
            }
            "4" => {
                let truck_id = prompt("Truck id: ")?;
                let bin_id = prompt("Bin id: ")?;
                let item_id = prompt("Item id: ")?;
                let quantity: i64 = prompt("Quantity: ")?
                    .parse()
                    .context("quantity must be a whole number")?;
                session
                    .show(
                        Method::POST,
                        &format!("/api/technician/trucks/{}/bins/{}", truck_id, bin_id),
                        Some(json!({ "itemId": item_id, "quantity": quantity })),
                    )
                    .await?
            }
            "5" => session.show(Method::GET, "/api/credits", None).await?,
            "6" => {
                println!("{}", "👋 Bye!".bright_green());
                break;
            }
            _ => println!("{}", "❌ Invalid option, try again.".bright_red()),
        }
    }

    Ok(())
}

struct Credentials {
    email: String,
    password: String,
}

struct Session {
    client: Client,
    base_url: String,
    token: String,
}

impl Session {
    /// Sends an authenticated request and pretty-prints the envelope
    async fn show(&self, method: Method, path: &str, body: Option<Value>) -> Result<()> {
        let url = format!("{}{}", self.base_url, path);
        println!();
        println!("{} {} {}", "📤".bright_blue(), method, url);

        let mut request = self.client.request(method, &url).bearer_auth(&self.token);
        if let Some(body) = body {
            println!("{}", serde_json::to_string_pretty(&body)?);
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if status.is_success() {
            println!("{} {}", "✅".bright_green(), status);
        } else {
            println!("{} {}", "❌".bright_red(), status);
        }
        println!("{}", serde_json::to_string_pretty(&body)?);
        Ok(())
    }
}

async fn check_health(client: &Client, base_url: &str) -> Result<()> {
    let response = client
        .get(format!("{}/health/ready", base_url))
        .send()
        .await
        .context("API is not reachable")?;

    if response.status().is_success() {
        println!("{}", "✅ API and database are ready".bright_green());
    } else {
        println!("{} {}", "⚠️ API answered".bright_yellow(), response.status());
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label.bright_yellow());
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

fn get_credentials() -> Result<Credentials> {
    println!();
    println!("{}", "🔐 TRUXTOK CREDENTIALS".bright_cyan().bold());
    println!("{}", "======================".bright_cyan());

    Ok(Credentials {
        email: prompt("Email: ")?,
        password: prompt("Password: ")?,
    })
}

async fn authenticate(client: &Client, base_url: &str, credentials: &Credentials) -> Result<String> {
    println!();
    println!("{}", "🔐 AUTHENTICATING...".bright_cyan().bold());

    let response = client
        .post(format!("{}/api/auth/login", base_url))
        .json(&json!({ "email": credentials.email, "password": credentials.password }))
        .send()
        .await?;

    let status = response.status();
    let body: Value = response.json().await?;

    if !status.is_success() {
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Err(anyhow!("❌ Login failed with {}", status));
    }

    let user = &body["data"]["user"];
    println!(
        "{} {} ({})",
        "✅ Logged in as".bright_green().bold(),
        user["name"].as_str().unwrap_or("?"),
        user["role"].as_str().unwrap_or("?")
    );

    body["data"]["token"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("❌ No token in the login response"))
}
