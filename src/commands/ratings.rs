use tabled::Tabled;

use taller::format::{display_date, format_percent, progress_bar};
use taller::forms::RatingForm;
use taller::whatsapp::share_link;
use taller::{Result, TallerError};

use super::{or_na, print_table, Context};

#[derive(Tabled)]
struct RatingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "EMAIL")]
    email: String,
    #[tabled(rename = "RATING")]
    stars: String,
    #[tabled(rename = "COMMENT")]
    comment: String,
}

#[derive(Tabled)]
struct DistributionRow {
    #[tabled(rename = "STARS")]
    stars: String,
    #[tabled(rename = "COUNT")]
    count: u64,
    #[tabled(rename = "SHARE")]
    share: String,
}

fn stars(score: u64) -> String {
    let filled = score.min(5) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// List customer ratings
pub fn cmd_list(ctx: &Context) -> Result<()> {
    let ratings = ctx.client()?.ratings()?;
    if ratings.is_empty() {
        println!("No ratings yet.");
        return Ok(());
    }

    let rows: Vec<RatingRow> = ratings
        .iter()
        .map(|r| RatingRow {
            id: r.id.clone(),
            date: display_date(r.date.as_deref()),
            name: r.author().to_string(),
            email: or_na(r.email.as_deref()),
            stars: stars(r.score),
            comment: or_na(r.comment.as_deref()),
        })
        .collect();
    print_table(rows);
    Ok(())
}

/// Average rating and distribution
pub fn cmd_stats(ctx: &Context) -> Result<()> {
    let stats = ctx.client()?.rating_stats()?;

    println!("Ratings: {}", stats.total);
    println!("Average: {:.1} / 5", stats.average);

    let rows: Vec<DistributionRow> = (1..=5u8)
        .rev()
        .map(|score| DistributionRow {
            stars: stars(score.into()),
            count: stats.count_for(score),
            share: format!(
                "{} {}",
                progress_bar(stats.share_for(score), 10),
                format_percent(stats.share_for(score))
            ),
        })
        .collect();
    print_table(rows);
    Ok(())
}

/// Delete a rating
pub fn cmd_delete(ctx: &Context, id: &str) -> Result<()> {
    ctx.client()?.delete_rating(id)?;
    println!("Rating #{id} deleted.");
    Ok(())
}

/// Leave a rating through the public endpoint
pub fn cmd_submit(ctx: &Context, form: RatingForm) -> Result<()> {
    let payload = form.validate()?;
    ctx.public_client()?.submit_rating(&payload)?;
    println!("Thank you for your rating!");
    Ok(())
}

/// Print the public rating page and a WhatsApp share link for it
pub fn cmd_link(ctx: &Context) -> Result<()> {
    let url = ctx
        .config
        .public
        .rating_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| {
            TallerError::validation("rating_url", "set [public] rating_url in config.toml")
        })?;

    let text = format!(
        "¡Hola! Nos encantaría conocer tu opinión sobre nuestro servicio. Déjanos tu valoración aquí: {url}"
    );
    println!("Rating page: {url}");
    println!("WhatsApp:    {}", share_link(&text));
    Ok(())
}
