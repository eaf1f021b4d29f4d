use crate::advisor::{Guidance, QuestionKind};
use crate::app::{AppContext, Result};
use crate::cli::PlatformArg;
use crate::platforms::{EdpuzzleScraper, McGrawHillScraper};
use crate::portal::ApplicationLauncher;
use crate::util;

pub async fn list_apps(ctx: &AppContext) -> Result<()> {
    let mut session = ctx.new_session();
    let launcher = ApplicationLauncher::new(ctx.config.portal.clone());

    let apps = launcher.list_applications(&mut session).await;
    session.close().await;

    if apps.is_empty() {
        println!("No applications found (check PORTAL_USERNAME / PORTAL_PASSWORD)");
        return Ok(());
    }

    for app in apps {
        match &app.description {
            Some(desc) => println!("{}\n  {}", app.name, desc),
            None => println!("{}", app.name),
        }
        if let Some(link) = &app.link {
            println!("  {link}");
        }
    }

    Ok(())
}

pub async fn list_assignments(ctx: &AppContext, platform: PlatformArg) -> Result<()> {
    let records = match platform {
        PlatformArg::Edpuzzle => {
            let mut scraper =
                EdpuzzleScraper::new(ctx.new_session(), ctx.config.portal.clone());
            let records = scraper.video_assignments().await;
            scraper.close().await;
            records
        }
        PlatformArg::McgrawHill => {
            let mut scraper =
                McGrawHillScraper::new(ctx.new_session(), ctx.config.portal.clone());
            let records = scraper.assignments().await;
            scraper.close().await;
            records
        }
    };

    if records.is_empty() {
        println!("No assignments found");
        return Ok(());
    }

    for record in records {
        let due = record.due_date.as_deref().unwrap_or("");
        println!(
            "[{}] {} — due {}",
            record.platform,
            record.title,
            util::format_due_date(due)
        );
        if let Some(status) = &record.status {
            println!("  status: {status}");
        }
        if let Some(teacher) = &record.teacher {
            println!("  teacher: {teacher}");
        }
        if !due.trim().is_empty() {
            println!("  remaining: {}", util::time_remaining(due));
        }
    }

    Ok(())
}

pub async fn list_materials(ctx: &AppContext) -> Result<()> {
    let mut scraper = McGrawHillScraper::new(ctx.new_session(), ctx.config.portal.clone());
    let materials = scraper.course_materials().await;
    scraper.close().await;

    if materials.is_empty() {
        println!("No course materials found");
        return Ok(());
    }

    for material in materials {
        match &material.description {
            Some(desc) => println!("{}\n  {}", material.title, desc),
            None => println!("{}", material.title),
        }
    }

    Ok(())
}

pub async fn show_progress(ctx: &AppContext) -> Result<()> {
    let mut scraper = EdpuzzleScraper::new(ctx.new_session(), ctx.config.portal.clone());
    let entries = scraper.video_progress().await;
    scraper.close().await;

    if entries.is_empty() {
        println!("No progress data found");
        return Ok(());
    }

    for entry in entries {
        println!("{}: {}", entry.title, entry.progress);
    }

    Ok(())
}

pub async fn guide(ctx: &AppContext, description: &str, context: &str) -> Result<()> {
    let guidance = ctx.advisor.analyze_assignment(description, context).await;
    print_guidance(&guidance)
}

pub async fn question(ctx: &AppContext, question: &str, kind: QuestionKind) -> Result<()> {
    let guidance = ctx.advisor.question_help(question, kind).await;
    print_guidance(&guidance)
}

pub async fn notes(ctx: &AppContext, topic: &str, points: &[String]) -> Result<()> {
    let guidance = ctx.advisor.study_notes(topic, points).await;
    print_guidance(&guidance)
}

pub fn check(ctx: &AppContext) -> Result<()> {
    let creds = &ctx.credentials;
    println!(
        "portal credentials: {}",
        if creds.is_complete() { "set" } else { "missing (PORTAL_USERNAME / PORTAL_PASSWORD)" }
    );
    println!(
        "study guidance: {}",
        if ctx.advisor.is_available() { "available" } else { "unavailable (OPENAI_API_KEY not set)" }
    );
    println!("portal login url: {}", ctx.config.portal.login_url);
    Ok(())
}

fn print_guidance(guidance: &Guidance) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(guidance)?);
    Ok(())
}
