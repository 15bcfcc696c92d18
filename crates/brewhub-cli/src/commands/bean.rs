use brewhub_core::{Bean, Database, RoastLevel};
use chrono::NaiveDate;
use clap::Subcommand;

use crate::common;

#[derive(Subcommand)]
pub enum BeanAction {
    /// List beans in the inventory
    List,
    /// Add a bean to the inventory
    Add {
        name: String,
        /// Stock on hand in grams
        #[arg(long, default_value_t = 0.0)]
        stock: f64,
        #[arg(long)]
        roaster: Option<String>,
        #[arg(long)]
        origin: Option<String>,
        /// LIGHT, MEDIUM_LIGHT, MEDIUM, MEDIUM_DARK or DARK
        #[arg(long)]
        roast_level: Option<String>,
        #[arg(long)]
        process: Option<String>,
        /// Roast date as YYYY-MM-DD
        #[arg(long)]
        roast_date: Option<String>,
    },
    /// Select the bean for the next brewing session
    Select { id: String },
}

pub fn run(action: BeanAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    match action {
        BeanAction::List => {
            for bean in db.list_beans()? {
                println!(
                    "{}  {}  {}  {:.0}g",
                    bean.id,
                    bean.name,
                    bean.roast_level.as_str(),
                    bean.stock_grams,
                );
            }
        }
        BeanAction::Add {
            name,
            stock,
            roaster,
            origin,
            roast_level,
            process,
            roast_date,
        } => {
            let mut bean = Bean::new(name, stock);
            if let Some(roaster) = roaster {
                bean.roaster_name = roaster;
            }
            if let Some(origin) = origin {
                bean.origin = origin;
            }
            if let Some(level) = roast_level {
                bean.roast_level = RoastLevel::parse(&level);
            }
            if let Some(process) = process {
                bean.process = process;
            }
            if let Some(date) = roast_date {
                bean.roast_date = Some(NaiveDate::parse_from_str(&date, "%Y-%m-%d")?);
            }
            db.save_bean(&bean)?;
            println!("Bean added: {} ({})", bean.name, bean.id);
        }
        BeanAction::Select { id } => {
            let bean = db.get_bean(&id)?;
            let (mut session, _) = common::load_session(&db);
            println!("Bean selected: {}", bean.name);
            session.select_bean(bean);
            common::save_session(&db, &session)?;
        }
    }
    Ok(())
}
