use trellis_http::{get, post, resource, HttpContext, HttpResult};

#[derive(Default)]
struct Users;

#[resource(base_path = "/users")]
impl Users {
    #[get]
    fn list(&self, ctx: &mut HttpContext) -> HttpResult<()> {
        ctx.response.send_text("users");
        Ok(())
    }

    #[get("/[id]")]
    #[post("/[id]")]
    fn show(&self, ctx: &mut HttpContext) -> HttpResult<()> {
        let id = ctx.request.params.get("id").unwrap_or_default().to_string();
        ctx.response.send_text(id);
        Ok(())
    }

    fn helper(&self) -> usize {
        1
    }
}

fn main() {
    let users = Users;
    assert_eq!(users.helper(), 1);
}
