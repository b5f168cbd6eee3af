use trellis_http::scanning::Resource;
use trellis_http::{put, resource, HttpContext, HttpResult};

#[derive(Default)]
struct AdminSettings {
    locked: bool,
}

#[resource(base_path = "/settings", scope = "admin")]
impl AdminSettings {
    #[put]
    fn update(&self, ctx: &mut HttpContext) -> HttpResult<()> {
        if self.locked {
            ctx.response.send_text("locked");
        }
        Ok(())
    }

    #[trellis_http::delete("/[key]")]
    fn remove(&self, _ctx: &mut HttpContext) -> HttpResult<()> {
        Ok(())
    }
}

fn main() {
    let descriptor = AdminSettings::descriptor();
    assert_eq!(descriptor.methods().len(), 2);
}
