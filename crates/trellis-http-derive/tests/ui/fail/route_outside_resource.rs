use trellis_http::{get, HttpContext, HttpResult};

#[get("/orphan")]
fn orphan(ctx: &mut HttpContext) -> HttpResult<()> {
    ctx.response.send_text("lost");
    Ok(())
}

fn main() {
    let _ = orphan;
}
