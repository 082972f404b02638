use booking_desk::app::render;
use booking_desk::config::{AdminCommand, Command, CustomerAction, DeskConfig, WaitlistAction, PASSWORD_ENV};
use booking_desk::core::adapter::ReservationDraft;
use booking_desk::core::calendar;
use booking_desk::core::forms::{self, BusinessDraft, LoginForm, WaitlistDraft};
use booking_desk::domain::business_types::BusinessType;
use booking_desk::domain::model::{CustomerUpdate, NewCustomer};
use booking_desk::domain::ports::BookingApi;
use booking_desk::utils::error::{DeskError, Result};
use booking_desk::utils::{logger, validation::Validate};
use booking_desk::{AuthSession, CliConfig, DeskViews, LocalStorage, RestClient, SessionStore};
use chrono::Local;
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if std::env::var("BOOKING_DESK_LOG_FORMAT").as_deref() == Ok("json") {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    let result = match cli.resolve() {
        Ok(config) => run(cli.command, &config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        std::process::exit(e.severity().exit_code());
    }
}

fn read_password() -> Result<String> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(password);
    }
    eprint!("Contraseña: ");
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn parse_day(raw: Option<&str>) -> Result<chrono::NaiveDate> {
    match raw {
        Some(raw) => booking_desk::utils::validation::parse_date("date", raw),
        None => Ok(Local::now().date_naive()),
    }
}

async fn run(command: Command, config: &DeskConfig) -> Result<()> {
    let store = SessionStore::new(LocalStorage::new(config.session_dir.clone()));

    // Commands that work without a session.
    let command = match command {
        Command::BusinessTypes => {
            print!("{}", render::business_types());
            return Ok(());
        }
        Command::Login { email, password } => {
            let password = match password {
                Some(p) => p,
                None => read_password()?,
            };
            let form = LoginForm { email, password };
            form.validate()?;

            let client = RestClient::from_config(config)?;
            let response = client
                .login(&form.email, &form.password, config.business_slug.as_deref())
                .await?;

            let mut session = AuthSession::new();
            session.login(response.user, response.token);
            store.save(&session).await?;

            let name = session.user().map(|u| u.name.as_str()).unwrap_or_default();
            tracing::info!("✅ Signed in as {}", name);
            println!("✅ Sesión iniciada como {}", name);
            return Ok(());
        }
        Command::Logout => {
            store.clear().await?;
            println!("👋 Sesión cerrada");
            return Ok(());
        }
        other => other,
    };

    let session = store.load().await;
    session.require_authenticated()?;

    let client = RestClient::from_config(config)?.with_session(&session);
    let mut views = DeskViews::new(client, session);
    let now = Local::now().naive_local();
    let today = now.date();

    match command {
        Command::Whoami => {
            let user = views.refresh_user().await?.clone();
            store.save(views.session()).await?;
            print!("{}", render::whoami(&user, &views.business()));
        }
        Command::Dashboard => {
            let view = views.dashboard(now, config.upcoming_minutes).await?;
            print!("{}", render::dashboard(&view));
        }
        Command::Today { status } => {
            let filter = forms::parse_status_filter(status.as_deref())?;
            print!("{}", render::today(&views.today(filter).await?));
        }
        Command::Reservations { search, status } => {
            let filter = forms::parse_status_filter(status.as_deref())?;
            print!("{}", render::reservations(&views.reservations(&search, filter).await?));
        }
        Command::Customers {
            search,
            vip,
            id,
            action,
        } => match (action, id) {
            (Some(CustomerAction::Add { name, phone, email, vip, notes }), _) => {
                let customer = views
                    .create_customer(&NewCustomer {
                        name,
                        phone,
                        email,
                        is_vip: vip,
                        notes,
                    })
                    .await?;
                println!("✅ Cliente creado");
                print!("{}", render::customer(&customer));
            }
            (
                Some(CustomerAction::Update {
                    id,
                    name,
                    phone,
                    email,
                    vip,
                    notes,
                }),
                _,
            ) => {
                let update = CustomerUpdate {
                    name,
                    phone,
                    email,
                    is_vip: vip,
                    notes,
                };
                let customer = views.update_customer(&id, &update).await?;
                println!("✅ Cliente actualizado");
                print!("{}", render::customer(&customer));
            }
            (None, Some(id)) => print!("{}", render::customer(&views.customer(&id).await?)),
            (None, None) => print!("{}", render::customers(&views.customers(&search, vip, today).await?)),
        },
        Command::Waitlist { action } => match action {
            Some(WaitlistAction::Add {
                name,
                phone,
                party,
                wait,
                notes,
            }) => {
                let draft = WaitlistDraft {
                    customer_name: name,
                    phone,
                    party_size: party,
                    estimated_wait: wait,
                    notes,
                };
                let entry = views.add_to_waitlist(&draft).await?;
                println!("✅ {} añadido a la lista de espera", entry.customer_name);
            }
            None => print!("{}", render::waitlist(&views.waitlist(now).await?)),
        },
        Command::Analytics { limit } => {
            let view = views
                .analytics(limit.unwrap_or(config.top_customers_limit))
                .await?;
            print!("{}", render::analytics(&view));
        }
        Command::Calendar { date, view, offset } => {
            let view = match view {
                Some(v) => v.parse().map_err(|e: String| DeskError::validation("view", e))?,
                None => config.calendar_view,
            };
            let anchor = calendar::shift(parse_day(date.as_deref())?, view, offset.into())
                .ok_or_else(|| DeskError::validation("offset", format!("offset {} is out of range", offset)))?;
            print!("{}", render::calendar(&views.calendar(anchor, view, now).await?));
        }
        Command::Book {
            customer,
            name,
            phone,
            email,
            date,
            time,
            party,
            occasion,
            requests,
        } => {
            let mut draft = ReservationDraft::for_reservation(today);
            if let Some(term) = customer {
                let found = views.find_customers(&term).await?;
                let picked = found.into_iter().next().ok_or_else(|| DeskError::NotFound {
                    entity: "customer".to_string(),
                    id: term.clone(),
                })?;
                draft.customer_id = Some(picked.id);
                draft.customer_name = picked.name;
                draft.customer_phone = picked.phone;
                draft.customer_email = picked.email.unwrap_or_default();
            }
            if !name.is_empty() {
                draft.customer_name = name;
            }
            if !phone.is_empty() {
                draft.customer_phone = phone;
            }
            if !email.is_empty() {
                draft.customer_email = email;
            }
            if let Some(date) = date {
                draft.reservation_date = date;
            }
            if let Some(time) = time {
                draft.reservation_time = time;
            }
            if let Some(party) = party {
                draft.party_size = party;
            }
            draft.special_occasion = occasion;
            draft.special_requests = requests;

            let created = views.book(&draft).await?;
            println!(
                "✅ {} creada: {} {} · {}",
                views.session().terminology().booking,
                created.reservation_date,
                created.reservation_time.as_deref().unwrap_or(""),
                created.customer_name()
            );
        }
        Command::Appointment {
            name,
            phone,
            date,
            time,
            service,
            notes,
        } => {
            let mut draft = ReservationDraft::for_appointment(today);
            draft.customer_name = name;
            draft.customer_phone = phone;
            draft.special_requests = notes;
            if let Some(date) = date {
                draft.reservation_date = date;
            }
            if let Some(time) = time {
                draft.reservation_time = time;
            }
            if let Some(wanted) = service {
                let services = views.services().await?;
                let chosen = services
                    .iter()
                    .find(|s| s.id == wanted || s.name.eq_ignore_ascii_case(&wanted))
                    .ok_or_else(|| DeskError::NotFound {
                        entity: "service".to_string(),
                        id: wanted.clone(),
                    })?;
                draft.choose_service(chosen);
            }

            let created = views.book(&draft).await?;
            println!(
                "✅ {} creada: {} {} · {}",
                views.session().terminology().booking,
                created.reservation_date,
                created.reservation_time.as_deref().unwrap_or(""),
                created.customer_name()
            );
        }
        Command::Status { id, status, waitlist } => {
            if waitlist {
                let status = forms::parse_waitlist_status(&status)?;
                let entry = views.set_waitlist_status(&id, status).await?;
                println!("✅ {} → {}", entry.customer_name, entry.status.as_str());
            } else {
                let status = forms::parse_status(&status)?;
                let updated = views.set_status(&id, status).await?;
                println!("✅ {} → {}", updated.customer_name(), updated.status.label());
            }
        }
        Command::Delete { id } => {
            views.cancel_appointment(&id).await?;
            println!("🗑️  Cita {} eliminada", id);
        }
        Command::Admin { action } => match action {
            Some(AdminCommand::Create {
                business_type,
                name,
                slug,
                admin_name,
                admin_email,
                admin_password,
            }) => {
                let kind = BusinessType::from_key(&business_type).ok_or_else(|| {
                    DeskError::validation("type", format!("unknown business type '{}'", business_type))
                })?;
                let mut draft = BusinessDraft::named(kind, name);
                if let Some(slug) = slug {
                    draft.slug = slug;
                }
                draft.admin_name = admin_name;
                draft.admin_email = admin_email;
                draft.admin_password = admin_password;

                let created = views.create_business(&draft).await?;
                println!("✅ Negocio creado: {} ({})", created.business.name, created.business.slug);
                println!("   Admin: {} <{}>", created.admin.name, created.admin.email);
                if let Some(password) = &created.admin.temporary_password {
                    println!("   Contraseña temporal: {}", password);
                }
            }
            None => print!("{}", render::admin(&views.admin().await?)),
        },
        Command::Export { output, dir } => {
            let storage = LocalStorage::new(dir);
            let written = views.export(&storage, &output).await?;
            println!("✅ Informe exportado");
            println!("📁 {}", storage.path_of(&written).display());
        }
        Command::BusinessTypes | Command::Login { .. } | Command::Logout => {}
    }

    Ok(())
}
