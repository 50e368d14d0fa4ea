use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process;

use clap::{Arg, ArgMatches, Command};
use log::error;
use pgstay::app::{AdminTab, Document, Route, View};
use pgstay::config::ClientOptions;
use pgstay::error::Error;
use pgstay::Portal;

fn cli() -> Command<'static> {
    Command::new("pgstay")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Command line client for the PG resident portal")
        .subcommand_required(true)
        .subcommand(
            Command::new("lead")
                .about("Leave an inquiry")
                .arg(required_value("name", "Your name"))
                .arg(required_value("mobile", "Mobile number to call back")),
        )
        .subcommand(
            Command::new("register")
                .about("Register as a resident")
                .arg(required_value("email", "Email address"))
                .arg(required_value("password", "Password"))
                .arg(required_value("mobile", "Mobile number"))
                .arg(required_value("first-name", "First name"))
                .arg(required_value("last-name", "Last name"))
                .arg(required_value("father-name", "Father's name"))
                .arg(required_value("aadhar", "Aadhar number"))
                .arg(required_value("address", "Permanent address"))
                .arg(optional_value("photo", "Profile photo to upload"))
                .arg(optional_value("aadhar-photo", "Aadhar card photo to upload"))
                .arg(
                    Arg::new("accept-terms")
                        .long("accept-terms")
                        .help("Accept the terms and conditions"),
                ),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in")
                .arg(required_value("email", "Email address"))
                .arg(required_value("password", "Password")),
        )
        .subcommand(Command::new("logout").about("Sign out and forget the stored session"))
        .subcommand(Command::new("whoami").about("Show the signed-in resident"))
        .subcommand(
            Command::new("recover")
                .about("Reset a forgotten password using an emailed OTP")
                .arg(required_value("email", "Email address of the account")),
        )
        .subcommand(
            Command::new("upload-photo")
                .about("Replace the profile photo")
                .arg(Arg::new("file").required(true).help("Image file")),
        )
        .subcommand(
            Command::new("upload-aadhar")
                .about("Replace the Aadhar card photo")
                .arg(Arg::new("file").required(true).help("Image file")),
        )
        .subcommand(
            Command::new("admin")
                .about("Admin listings")
                .subcommand_required(true)
                .subcommand(Command::new("leads").about("List inquiries"))
                .subcommand(Command::new("users").about("List registered residents")),
        )
}

fn required_value(name: &'static str, help: &'static str) -> Arg<'static> {
    Arg::new(name)
        .long(name)
        .takes_value(true)
        .required(true)
        .help(help)
}

fn optional_value(name: &'static str, help: &'static str) -> Arg<'static> {
    Arg::new(name).long(name).takes_value(true).help(help)
}

fn value(matches: &ArgMatches, name: &str) -> String {
    matches.value_of(name).unwrap_or_default().to_string()
}

async fn read_image(path: &str) -> Result<(Vec<u8>, String), Error> {
    let contents = tokio::fs::read(path)
        .await
        .map_err(|e| Error::general(format!("Cannot read {}: {}", path, e)))?;
    let file_name = Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload")
        .to_string();
    Ok((contents, file_name))
}

fn prompt(label: &str) -> Result<String, Error> {
    print!("{}: ", label);
    io::stdout().flush().map_err(Error::general)?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(Error::general)?;
    Ok(line.trim().to_string())
}

async fn run(matches: ArgMatches) -> Result<(), Error> {
    let portal = Portal::new(ClientOptions::from_env()?)?;
    portal.start().await;

    match matches.subcommand() {
        Some(("lead", sub)) => {
            let mut form = portal.lead_form();
            form.name = value(sub, "name");
            form.mobile = value(sub, "mobile");
            let result = form.submit().await;
            if let Some(banner) = form.banner() {
                println!("{}", banner.message());
            }
            result?;
        }
        Some(("register", sub)) => {
            let mut form = portal.registration_form();
            form.details.email = value(sub, "email");
            form.details.password = value(sub, "password");
            form.details.mobile = value(sub, "mobile");
            form.details.first_name = value(sub, "first-name");
            form.details.last_name = value(sub, "last-name");
            form.details.father_name = value(sub, "father-name");
            form.details.aadhar = value(sub, "aadhar");
            form.details.address = value(sub, "address");
            form.accepted_terms = sub.is_present("accept-terms");

            for (arg, document) in [("photo", Document::Photo), ("aadhar-photo", Document::AadharPhoto)] {
                if let Some(path) = sub.value_of(arg) {
                    let (contents, file_name) = read_image(path).await?;
                    if form.attach(document, contents, &file_name).await.is_err() {
                        return Err(Error::general(document.failure_message()));
                    }
                }
            }

            match form.submit().await {
                Ok(resident) => println!("Welcome, {}", resident.full_name()),
                Err(e) => return Err(Error::general(form.error().unwrap_or(&e.to_string()))),
            }
        }
        Some(("login", sub)) => {
            let mut form = portal.login_form();
            form.email = value(sub, "email");
            form.password = value(sub, "password");
            match form.submit().await {
                Ok(resident) => println!("Signed in as {}", resident.email),
                Err(e) => return Err(Error::general(form.error().unwrap_or(&e.to_string()))),
            }
        }
        Some(("logout", _)) => {
            portal.logout();
            println!("Signed out");
        }
        Some(("whoami", _)) => match portal.session().current_identity() {
            Some(resident) => {
                println!("{} <{}>", resident.full_name(), resident.email);
                println!("Mobile:  {}", resident.mobile);
                println!("Address: {}", resident.address);
                println!("Photo:   {}", resident.photo().unwrap_or("-"));
                println!("Aadhar:  {}", resident.aadhar_photo().unwrap_or("-"));
                if resident.is_admin {
                    println!("Admin");
                }
            }
            None => println!("Not signed in"),
        },
        Some(("recover", sub)) => {
            let mut page = portal.password_recovery();
            page.request_code(&value(sub, "email")).await?;
            println!("{}", page.message().unwrap_or_default());

            loop {
                let code = prompt("OTP")?;
                match page.verify_code(&code).await {
                    Ok(()) => break,
                    Err(e) if e.is_local() => println!("{}", e),
                    Err(e) => return Err(e.into()),
                }
            }
            println!("{}", page.message().unwrap_or_default());

            loop {
                let new_password = prompt("New password")?;
                let confirmation = prompt("Confirm password")?;
                match page.set_new_password(&new_password, &confirmation).await {
                    Ok(()) => break,
                    Err(e) if e.is_local() => println!("{}", e),
                    Err(e) => return Err(e.into()),
                }
            }
            println!("{}", page.message().unwrap_or_default());
            page.wait_for_redirect().await;
            println!("You can now sign in at {}", View::Login.path());
        }
        Some((name @ ("upload-photo" | "upload-aadhar"), sub)) => {
            let document = if name == "upload-photo" {
                Document::Photo
            } else {
                Document::AadharPhoto
            };
            let mut dashboard = portal.dashboard();
            if dashboard.open() != Route::Show(View::Dashboard) {
                return Err(Error::general("Please sign in first"));
            }
            let (contents, file_name) = read_image(&value(sub, "file")).await?;
            if dashboard.replace(document, contents, &file_name).await.is_err() {
                return Err(Error::general(document.failure_message()));
            }
            println!("Updated");
        }
        Some(("admin", sub)) => {
            let mut panel = portal.admin_panel();
            if panel.load().await != Route::Show(View::Admin) {
                return Err(Error::general("Admin access required"));
            }
            match sub.subcommand_name() {
                Some("users") => {
                    panel.select_tab(AdminTab::Users);
                    for resident in panel.residents() {
                        println!(
                            "{:>5}  {:<30} {:<15} {}",
                            resident.id,
                            resident.full_name(),
                            resident.mobile,
                            resident.email
                        );
                    }
                }
                _ => {
                    for lead in panel.leads() {
                        println!(
                            "{:>5}  {:<30} {:<15} {}",
                            lead.id,
                            lead.name,
                            lead.mobile,
                            lead.created_at.format("%Y-%m-%d %H:%M")
                        );
                    }
                }
            }
        }
        _ => unreachable!("subcommand_required"),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    let matches = cli().get_matches();
    if let Err(e) = run(matches).await {
        error!("{:?}", e);
        eprintln!("{}", e.user_message("Something went wrong. Please try again."));
        process::exit(1);
    }
}
