use corkboard::client::Client;
use corkboard::planner::Planner;
use corkboard::session::SessionStore;
use corkboard::utils;

// TODO: change these values with yours
pub const URL: &str = "http://localhost:5000/";
pub const EMAIL: &str = "john@example.com";
pub const PASSWORD: &str = "secret_password";

#[tokio::main]
async fn main() {
    env_logger::init();

    let store = match SessionStore::from_file(&SessionStore::session_file()) {
        Ok(store) => store,
        Err(err) => {
            log::warn!("No restorable session ({}). Logging in again", err);
            let mut store = SessionStore::new(&SessionStore::session_file());
            let session = Client::login(URL, EMAIL, PASSWORD).await.unwrap();
            store.set_session(session);
            store
        }
    };

    let session = store.session().unwrap().clone();
    println!("Logged in as {}", session.username());

    let client = Client::new(URL, session).unwrap();
    let overview = client.analytics_overview().await;

    let mut planner = Planner::new(client);
    if planner.refresh().await.is_err() {
        log::warn!("Unable to fetch tasks, the calendar will be empty. See the previous log lines for more info.");
    }

    println!("---- {} tasks ----", planner.tasks().len());
    utils::print_task_list(planner.tasks());
    println!();
    utils::print_month(&planner.month_grid(), &planner.days_with_tasks());

    match overview {
        Ok(overview) => {
            println!();
            utils::print_overview(&overview);
        }
        Err(err) => log::warn!("Unable to fetch the analytics overview: {}", err),
    }
}
