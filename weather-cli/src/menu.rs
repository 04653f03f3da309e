//! Interactive menu loop.
//!
//! One command runs to completion (network call included) before the next
//! prompt is shown.

use anyhow::Result;
use inquire::{InquireError, Password, Select, Text};
use std::{fmt, io::Write};
use weather_core::{
    AuthError, Preferences, User, UserStore, WeatherService, account, auth,
};

#[derive(Debug, Clone, Copy)]
enum MainChoice {
    Register,
    Login,
    Exit,
}

impl fmt::Display for MainChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Register => "Register",
            Self::Login => "Login",
            Self::Exit => "Exit",
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum DashboardChoice {
    ViewWeather,
    ChangePreferences,
    OtherLocation,
    ListUsers,
    Logout,
}

impl fmt::Display for DashboardChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ViewWeather => "View My Weather",
            Self::ChangePreferences => "Change Preferences",
            Self::OtherLocation => "View Other Location",
            Self::ListUsers => "List Users",
            Self::Logout => "Logout",
        })
    }
}

/// `None` when the user pressed Esc or Ctrl-C.
fn answered<T>(result: Result<T, InquireError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub async fn run<W: Write>(store: &dyn UserStore, weather: &mut WeatherService<W>) -> Result<()> {
    loop {
        println!("\n=== Weather CLI App ===");
        let options = vec![MainChoice::Register, MainChoice::Login, MainChoice::Exit];

        match answered(Select::new("Choose an option:", options).prompt())? {
            Some(MainChoice::Register) => register(store).await?,
            Some(MainChoice::Login) => {
                if let Some(user) = login(store).await? {
                    dashboard(store, weather, &user.user_id).await?;
                }
            }
            Some(MainChoice::Exit) | None => {
                println!("Exiting...");
                return Ok(());
            }
        }
    }
}

async fn register(store: &dyn UserStore) -> Result<()> {
    let Some(user_id) = answered(Text::new("User ID:").prompt())? else { return Ok(()) };
    let Some(name) = answered(Text::new("Name:").prompt())? else { return Ok(()) };
    let Some(password) =
        answered(Password::new("Password:").without_confirmation().prompt())?
    else {
        return Ok(());
    };

    match auth::register(store, &user_id, &name, &password).await {
        Ok(user) => println!("Registered {} ({})", user.name, user.user_id),
        Err(AuthError::Store(e)) => return Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, "registration failed");
            println!("Registration failed: {e}");
        }
    }
    Ok(())
}

/// Returns the logged-in user with preferences guaranteed to be set.
async fn login(store: &dyn UserStore) -> Result<Option<User>> {
    let Some(name) = answered(Text::new("Name:").prompt())? else { return Ok(None) };
    let Some(password) =
        answered(Password::new("Password:").without_confirmation().prompt())?
    else {
        return Ok(None);
    };

    let user = match auth::login(store, &name, &password).await {
        Ok(user) => user,
        Err(AuthError::Store(e)) => return Err(e.into()),
        Err(e) => {
            println!("Login failed: {e}");
            return Ok(None);
        }
    };

    println!("Welcome, {}!", user.name);

    if account::needs_preferences(&user) {
        println!("\nPlease set your weather preferences:");
        let Some(prefs) = prompt_preferences(&user.preferences)? else { return Ok(None) };
        return Ok(Some(account::set_preferences(store, &user.user_id, prefs).await?));
    }

    Ok(Some(user))
}

async fn dashboard<W: Write>(
    store: &dyn UserStore,
    weather: &mut WeatherService<W>,
    user_id: &str,
) -> Result<()> {
    loop {
        println!("\n=== Dashboard ===");
        let options = vec![
            DashboardChoice::ViewWeather,
            DashboardChoice::ChangePreferences,
            DashboardChoice::OtherLocation,
            DashboardChoice::ListUsers,
            DashboardChoice::Logout,
        ];

        match answered(Select::new("Choose an option:", options).prompt())? {
            Some(DashboardChoice::ViewWeather) => match store.get(user_id).await {
                Ok(Some(user)) => weather.show_weather(&user).await?,
                Ok(None) => println!("Error fetching user: user '{user_id}' not found"),
                Err(e) => println!("Error fetching user: {e}"),
            },
            Some(DashboardChoice::ChangePreferences) => {
                let current = store.get(user_id).await?.map(|u| u.preferences).unwrap_or_default();
                if let Some(prefs) = prompt_preferences(&current)? {
                    account::set_preferences(store, user_id, prefs).await?;
                    println!("Preferences updated");
                }
            }
            Some(DashboardChoice::OtherLocation) => {
                if let Some(location) = answered(Text::new("Enter location:").prompt())? {
                    weather.show_other_location(&location).await?;
                }
            }
            Some(DashboardChoice::ListUsers) => {
                for (id, name) in account::list_users(store).await? {
                    println!("UserID: {id}, Name: {name}");
                }
            }
            Some(DashboardChoice::Logout) | None => return Ok(()),
        }
    }
}

fn prompt_preferences(current: &Preferences) -> Result<Option<Preferences>> {
    let Some(location) =
        answered(Text::new("Enter your location:").with_initial_value(&current.location).prompt())?
    else {
        return Ok(None);
    };
    let Some(unit) = choose("Unit:", &["celsius", "fahrenheit"], &current.unit)? else {
        return Ok(None);
    };
    let Some(verbosity) = choose("Verbosity:", &["brief", "verbose"], &current.verbosity)? else {
        return Ok(None);
    };
    let Some(forecast) = choose("Forecast:", &["day", "week", "month"], &current.forecast)? else {
        return Ok(None);
    };

    Ok(Some(Preferences { location: location.trim().to_string(), unit, verbosity, forecast }))
}

fn choose(message: &str, options: &[&str], current: &str) -> Result<Option<String>> {
    let start = options.iter().position(|o| o.eq_ignore_ascii_case(current.trim())).unwrap_or(0);
    let picked = answered(Select::new(message, options.to_vec()).with_starting_cursor(start).prompt())?;
    Ok(picked.map(str::to_string))
}
