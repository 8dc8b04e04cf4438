use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use pan_course::{
    LinkResolver,
    common::{
        logger::PrettyLogger,
        models::{Category, CategoryIcon},
    },
    log_error, log_success, log_warning,
    store::Database,
};

mod cli;

use cli::{CategoryCommand, Command, CourseCommand};

type Result<T> = anyhow::Result<T>;

/// 打开数据库，迁移失败时直接退出，不能带着错位的表结构继续运行
fn open_database(args: &cli::Cli) -> Result<Database> {
    let (db, report) = Database::open(&args.db)
        .with_context(|| format!("数据库迁移失败: {:?}", args.db))?;
    for table in &report.created_tables {
        info!("已创建数据表: {}", table);
    }
    for (table, column) in &report.added_columns {
        info!("已添加字段: {}.{}", table, column);
    }
    Ok(db)
}

async fn run_serve(args: &cli::Cli, serve: &cli::ServeArgs) -> Result<()> {
    let db = open_database(args)?;
    let config = args.app_config(serve);
    tokio::fs::create_dir_all(&config.upload_dir).await?;
    pan_course::server::serve(&config, db).await
}

async fn run_resolve(
    url: &str,
    password: Option<&str>,
    resolver: &cli::ResolverArgs,
) -> Result<()> {
    let resolver = LinkResolver::from_config(&resolver.to_config())?;
    if let Some(platform) = resolver.detect_platform(url) {
        info!("识别到平台: {}", platform.label());
    }
    match resolver.resolve(url, password).await {
        Ok(info) => {
            PrettyLogger::share_info(&info);
            Ok(())
        }
        Err(e) => {
            log_error!("{} ({})", e, e.kind());
            Err(e.into())
        }
    }
}

fn run_courses(db: &Database, command: &CourseCommand) -> Result<()> {
    match command {
        CourseCommand::List { category } => {
            let courses = match category {
                Some(category) => db.courses().list_by_category(category)?,
                None => db.courses().list()?,
            };
            PrettyLogger::title(format!("共 {} 门课程", courses.len()));
            for course in &courses {
                PrettyLogger::course(course);
            }
        }
        CourseCommand::Watch { id } => {
            let before = db.courses().get(id)?;
            let course = db.courses().advance_progress(id)?;
            if course.watched_episodes == before.watched_episodes {
                log_warning!("《{}》已看完", course.title);
            } else {
                log_success!("《{}》进度更新", course.title);
            }
            PrettyLogger::course(&course);
        }
        CourseCommand::Delete { id } => {
            db.courses().delete(id)?;
            log_success!("已删除课程 {}", id);
        }
    }
    Ok(())
}

fn run_categories(db: &Database, command: &CategoryCommand) -> Result<()> {
    match command {
        CategoryCommand::List => {
            for category in db.categories().list()? {
                PrettyLogger::category(&category);
            }
        }
        CategoryCommand::Add { name, icon } => {
            let category = db.categories().create(Category {
                id: String::new(),
                name: name.clone(),
                icon: icon.clone(),
            })?;
            log_success!("已添加分类");
            PrettyLogger::category(&category);
        }
        CategoryCommand::Icons => {
            for icon in CategoryIcon::ALL {
                PrettyLogger::info(icon.key());
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let args = cli::Cli::parse();

    // 初始化日志
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let result = match &args.command {
        Command::Serve(serve) => run_serve(&args, serve).await,
        Command::Migrate => open_database(&args).map(|_| {
            PrettyLogger::success("数据库迁移完成");
        }),
        Command::Resolve {
            url,
            password,
            resolver,
        } => run_resolve(url, password.as_deref(), resolver).await,
        Command::Courses(command) => {
            open_database(&args).and_then(|db| run_courses(&db, command))
        }
        Command::Categories(command) => {
            open_database(&args).and_then(|db| run_categories(&db, command))
        }
    };

    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}
