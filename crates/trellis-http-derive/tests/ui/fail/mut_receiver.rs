use trellis_http::resource;

#[derive(Default)]
struct Basket;

#[resource("/basket")]
impl Basket {
    #[post("/clear")]
    fn clear(&mut self, ctx: &mut trellis_http::HttpContext) -> trellis_http::HttpResult<()> {
        ctx.response.send_text("cleared");
        Ok(())
    }
}

fn main() {
    let _ = Basket;
}
