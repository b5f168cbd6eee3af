use trellis_http::{resource, route, HttpContext, HttpError};

struct Health;

#[resource("/health")]
impl Health {
    #[route(GET)]
    fn status(ctx: &mut HttpContext) -> Result<(), HttpError> {
        ctx.response.send_text("ok");
        Ok(())
    }

    #[route(ALL, "/touch")]
    fn touch(ctx: &mut HttpContext) {
        ctx.response.mark_responded();
    }

    pub fn new() -> Self {
        Health
    }
}

fn main() {
    let _ = Health::new();
}
